use serde::Deserialize;
use std::path::Path;

use nodebreaker_core::config::GameConfig;

use crate::error::ScenarioError;

/// Deterministic autoplay strategy for a scenario.
///
/// All policies pick from the current valid-move set; they differ only in
/// which candidate they prefer. Ties resolve to construction order, so a
/// `(policy, seed)` pair fully determines a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Policy {
    /// Always the first candidate in construction order.
    #[default]
    FirstValid,
    /// Grab breaker nodes when offered, then spend on data nodes.
    PreferBreakers,
    /// Stick to plain nodes for as long as possible.
    PreferNormal,
}

/// A demo scenario: an engine configuration, a seed, and an autoplay policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFile {
    pub id: String,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub config: GameConfig,
    #[serde(default)]
    pub policy: Policy,
}

/// Load a scenario from a `.ron` file.
pub fn load_scenario_file(path: &Path) -> Result<ScenarioFile, ScenarioError> {
    let content = std::fs::read_to_string(path)?;
    ron::from_str(&content).map_err(|e| ScenarioError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    })
}
