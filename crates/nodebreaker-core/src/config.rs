//! Session configuration and validation.
//!
//! All knobs are plain values deserializable with serde. Validation runs
//! once at session construction and fails fast: a configuration that cannot
//! satisfy the connectivity invariant (or that is internally inconsistent)
//! must never reach mid-session code.

use serde::{Deserialize, Serialize};

/// Injected time unit for the trace mechanic. The presentation layer decides
/// what a tick means (the defaults treat it as milliseconds); the core never
/// reads a wall clock.
pub type Ticks = u64;

/// Errors that make a session configuration unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("lattice size must be at least 1")]
    InvalidLatticeSize,
    #[error("{requested} breakable nodes leave no traversable subgraph in a {size}^3 lattice")]
    TooManyBreakableNodes { requested: u32, size: u32 },
    #[error("{requested} breaker nodes exceed the {available} non-breakable nodes")]
    TooManyBreakerNodes { requested: u32, available: u64 },
    #[error("trace interval must be at least 1 tick")]
    InvalidTraceInterval,
    #[error("assignment attempt budget must be at least 1")]
    InvalidAttemptBudget,
    #[error("no connectivity-preserving breakable assignment found after {attempts} attempts")]
    ConnectivityUnsatisfiable { attempts: u32 },
}

/// Per-category score rewards for traversing a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRewards {
    pub normal: u32,
    pub breaker: u32,
    pub breakable: u32,
}

impl Default for ScoreRewards {
    fn default() -> Self {
        Self {
            normal: 5,
            breaker: 5,
            breakable: 10,
        }
    }
}

/// Configuration for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the cubic lattice.
    pub size: u32,
    /// World-space distance between adjacent nodes.
    pub spacing: f32,
    /// Number of data nodes to place (subject to the connectivity invariant).
    pub breakable_count: u32,
    /// Number of breaker nodes to place in the non-breakable pool.
    pub breaker_count: u32,
    /// Score rewards per node category.
    pub rewards: ScoreRewards,
    /// Ticks between trace consumptions of a drawn path segment.
    pub trace_interval: Ticks,
    /// Retry budget for the breakable-assignment connectivity loop.
    pub max_assignment_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: 4,
            spacing: 3.0,
            breakable_count: 6,
            breaker_count: 2,
            rewards: ScoreRewards::default(),
            trace_interval: 2000,
            max_assignment_attempts: 1000,
        }
    }
}

impl GameConfig {
    /// Total number of nodes in the lattice.
    pub fn node_count(&self) -> u64 {
        (self.size as u64).pow(3)
    }

    /// Validate the configuration. At least one non-breakable node must
    /// remain after assignment, and breakers draw from that pool.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::InvalidLatticeSize);
        }
        let nodes = self.node_count();
        if self.breakable_count as u64 >= nodes {
            return Err(ConfigError::TooManyBreakableNodes {
                requested: self.breakable_count,
                size: self.size,
            });
        }
        let available = nodes - self.breakable_count as u64;
        if self.breaker_count as u64 > available {
            return Err(ConfigError::TooManyBreakerNodes {
                requested: self.breaker_count,
                available,
            });
        }
        if self.trace_interval == 0 {
            return Err(ConfigError::InvalidTraceInterval);
        }
        if self.max_assignment_attempts == 0 {
            return Err(ConfigError::InvalidAttemptBudget);
        }
        Ok(())
    }
}
