//! Versioned session saves.
//!
//! Binary serialization via `bitcode` with a magic + version header, so a
//! save can be rejected before attempting to interpret the payload. The
//! event bus is not part of a save (it holds closures); listeners
//! re-register against the restored session.

use crate::config::GameConfig;
use crate::event::EventBus;
use crate::network::NodeNetwork;
use crate::rng::SimRng;
use crate::session::{GameSession, SessionPhase};
use crate::state::{GameState, Outcome};
use crate::store::HighScoreStore;
use crate::trace::TraceState;
use serde::{Deserialize, Serialize};

/// Magic number identifying a nodebreaker session save.
pub const SNAPSHOT_MAGIC: u32 = 0x4E42_5301;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

/// Errors that can occur while saving a session.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while restoring a session.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("save from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

/// Header prepended to every save. Enables format detection and version
/// checking before trusting the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: u32,
    pub version: u32,
    /// Number of accepted moves at save time.
    pub moves: u64,
}

impl SaveHeader {
    /// Create a header for the current format version.
    pub fn new(moves: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            moves,
        }
    }

    /// Validate the header. Returns `Ok(())` if this build can read it.
    pub fn validate(&self) -> Result<(), RestoreError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(RestoreError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(RestoreError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(RestoreError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

/// The serializable portion of a session. Excludes the event bus and the
/// injected high-score store.
#[derive(Debug, Serialize, Deserialize)]
struct SessionSave {
    header: SaveHeader,
    config: GameConfig,
    network: NodeNetwork,
    state: GameState,
    trace: TraceState,
    phase: SessionPhase,
    outcome: Option<Outcome>,
    rng: SimRng,
}

impl GameSession {
    /// Serialize the session to a versioned binary save.
    pub fn save(&self) -> Result<Vec<u8>, SaveError> {
        let save = SessionSave {
            header: SaveHeader::new(self.state.path().len() as u64),
            config: self.config.clone(),
            network: self.network.clone(),
            state: self.state.clone(),
            trace: self.trace.clone(),
            phase: self.phase,
            outcome: self.outcome,
            rng: self.rng.clone(),
        };
        bitcode::serialize(&save).map_err(|e| SaveError::Encode(e.to_string()))
    }

    /// Restore a session from a save. The store is injected fresh; the
    /// event bus starts empty and listeners must re-register.
    pub fn restore(
        data: &[u8],
        store: Box<dyn HighScoreStore>,
    ) -> Result<GameSession, RestoreError> {
        let save: SessionSave =
            bitcode::deserialize(data).map_err(|e| RestoreError::Decode(e.to_string()))?;
        save.header.validate()?;
        Ok(GameSession {
            config: save.config,
            network: save.network,
            state: save.state,
            trace: save.trace,
            phase: save.phase,
            outcome: save.outcome,
            rng: save.rng,
            event_bus: EventBus::default(),
            store,
        })
    }
}
