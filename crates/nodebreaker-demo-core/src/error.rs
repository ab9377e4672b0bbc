use std::path::PathBuf;

use nodebreaker_core::config::ConfigError;

/// Errors that can occur in the demo scenario runner.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The requested scenario was not found in the manifest.
    #[error("scenario '{id}' not found in manifest")]
    ScenarioNotFound { id: String },

    /// Failed to parse a scenario or manifest file.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The engine rejected the scenario's configuration.
    #[error("engine configuration rejected: {0}")]
    Config(#[from] ConfigError),

    /// Autoplay failed to drive the session to a terminal state.
    #[error("scenario '{id}' never reached a terminal state")]
    DidNotTerminate { id: String },
}
