//! Session bookkeeping state and the terminal decision table.
//!
//! [`GameState`] is a pure state container: every setter mutates one field
//! and emits the matching typed event through the bus handed to it. The
//! state never stores the bus -- collaborators are passed explicitly, which
//! keeps the container serializable and free of closures.

use crate::event::{Event, EventBus};
use crate::id::NodeId;
use crate::store::{HIGH_SCORE_KEY, HighScoreStore};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Terminal outcomes
// ---------------------------------------------------------------------------

/// Why a session ended in a loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StuckReason {
    /// Unreached data nodes remain and no breakers are left to spend.
    DeadEnd,
    /// No legal move exists and the position is otherwise unresolvable.
    OutOfMoves,
    /// The trace consumed every drawn path segment.
    Traced,
}

impl std::fmt::Display for StuckReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StuckReason::DeadEnd => {
                write!(f, "dead end: no breakers left for the remaining data nodes")
            }
            StuckReason::OutOfMoves => write!(f, "you got stuck"),
            StuckReason::Traced => write!(f, "the trace caught up with you"),
        }
    }
}

/// Terminal outcome of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Stuck(StuckReason),
}

/// The decision table applied when the valid-move set becomes empty.
///
/// | condition                                  | outcome             |
/// |--------------------------------------------|---------------------|
/// | unreached data nodes and zero breakers     | stuck (dead end)    |
/// | no unreached data nodes                    | won                 |
/// | anything else                              | stuck (out of moves)|
pub fn decide_outcome(unreached_breakable: bool, breaker_count: u32) -> Outcome {
    if unreached_breakable && breaker_count == 0 {
        Outcome::Stuck(StuckReason::DeadEnd)
    } else if !unreached_breakable {
        Outcome::Won
    } else {
        Outcome::Stuck(StuckReason::OutOfMoves)
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Mutable session state: score, resources, the traversal path, and the
/// assorted lifecycle flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    score: u32,
    high_score: u32,
    path: Vec<NodeId>,
    breaker_count: u32,
    processing: bool,
    hidden: Vec<NodeId>,
    traced: bool,
    initialized: bool,
    completed: bool,
    valid_moves_left: bool,
}

impl GameState {
    /// Fresh state for a new session, with the high score loaded from the
    /// injected store.
    pub fn new(store: &dyn HighScoreStore) -> Self {
        Self {
            score: 0,
            high_score: store.get(HIGH_SCORE_KEY).unwrap_or(0),
            path: Vec::new(),
            breaker_count: 0,
            processing: false,
            hidden: Vec::new(),
            traced: false,
            initialized: false,
            completed: false,
            valid_moves_left: true,
        }
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// The traversal path in insertion order. Never reordered.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn breaker_count(&self) -> u32 {
        self.breaker_count
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn hidden(&self) -> &[NodeId] {
        &self.hidden
    }

    pub fn is_traced(&self) -> bool {
        self.traced
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn valid_moves_left(&self) -> bool {
        self.valid_moves_left
    }

    // -----------------------------------------------------------------------
    // Setters (mutate + emit)
    // -----------------------------------------------------------------------

    pub fn set_score(&mut self, score: u32, bus: &mut EventBus) {
        self.score = score;
        bus.emit(Event::ScoreChanged { score });
    }

    pub fn set_breaker_count(&mut self, count: u32, bus: &mut EventBus) {
        self.breaker_count = count;
        bus.emit(Event::BreakerCountChanged { count });
    }

    pub fn set_processing(&mut self, processing: bool, bus: &mut EventBus) {
        self.processing = processing;
        bus.emit(Event::ProcessingChanged { processing });
    }

    pub fn set_traced(&mut self, traced: bool) {
        self.traced = traced;
    }

    /// Append a node to the traversal path.
    pub fn push_path(&mut self, node: NodeId) {
        self.path.push(node);
    }

    pub fn add_hidden_node(&mut self, node: NodeId, bus: &mut EventBus) {
        if !self.hidden.contains(&node) {
            self.hidden.push(node);
        }
        bus.emit(Event::HiddenNodesChanged {
            count: self.hidden.len() as u32,
        });
    }

    pub fn remove_hidden_node(&mut self, node: NodeId, bus: &mut EventBus) {
        self.hidden.retain(|&id| id != node);
        bus.emit(Event::HiddenNodesChanged {
            count: self.hidden.len() as u32,
        });
    }

    pub fn clear_hidden_nodes(&mut self, bus: &mut EventBus) {
        self.hidden.clear();
        bus.emit(Event::HiddenNodesChanged { count: 0 });
    }

    /// Mark the one-time intro as done. Survives [`GameState::reset`].
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    pub fn set_valid_moves_left(&mut self, left: bool) {
        self.valid_moves_left = left;
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Persist the final score if it beats the stored high score. Returns
    /// whether a new high score was set.
    pub fn record_final_score(&mut self, store: &mut dyn HighScoreStore) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            store.set(HIGH_SCORE_KEY, self.score);
            true
        } else {
            false
        }
    }

    /// Restore initial values for a new session: score, resources, path and
    /// hidden set cleared, high score reloaded from the store. `initialized`
    /// is forced true so a restarted session skips one-time intro state.
    pub fn reset(&mut self, store: &dyn HighScoreStore, bus: &mut EventBus) {
        self.high_score = store.get(HIGH_SCORE_KEY).unwrap_or(0);
        self.score = 0;
        self.path.clear();
        self.breaker_count = 0;
        self.processing = false;
        self.hidden.clear();
        self.traced = false;
        self.initialized = true;
        self.completed = false;
        self.valid_moves_left = true;
        bus.emit(Event::StateReset);
    }
}
