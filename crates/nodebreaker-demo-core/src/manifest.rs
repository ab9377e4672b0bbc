use serde::Deserialize;
use std::path::Path;

use crate::error::ScenarioError;

/// Top-level manifest listing all demo scenarios.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioManifest {
    pub gallery_title: String,
    pub gallery_description: String,
    pub scenarios: Vec<ScenarioEntry>,
}

/// An entry in the manifest pointing to a scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioEntry {
    pub id: String,
    /// Relative path from the scenarios directory to the scenario file.
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Load the scenario manifest from a `manifest.ron` file.
pub fn load_manifest(scenarios_dir: &Path) -> Result<ScenarioManifest, ScenarioError> {
    let path = scenarios_dir.join("manifest.ron");
    let content = std::fs::read_to_string(&path)?;
    ron::from_str(&content).map_err(|e| ScenarioError::Parse {
        file: path,
        detail: e.to_string(),
    })
}
