//! Headless autoplay: drives a session to a terminal state under a
//! scenario's policy and summarizes what happened.

use std::path::{Path, PathBuf};

use nodebreaker_core::id::NodeId;
use nodebreaker_core::node::NodeFlags;
use nodebreaker_core::session::GameSession;
use nodebreaker_core::state::Outcome;
use nodebreaker_core::store::MemoryHighScoreStore;

use crate::error::ScenarioError;
use crate::manifest::{ScenarioEntry, ScenarioManifest, load_manifest};
use crate::scenario::{Policy, ScenarioFile, load_scenario_file};

/// Summary of one autoplayed scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario_id: String,
    pub outcome: Outcome,
    pub score: u32,
    /// Accepted moves, including the opening one.
    pub moves: u32,
    pub breakers_earned: u32,
    pub breakers_spent: u32,
    pub new_high_score: bool,
}

/// Run a scenario from construction to terminal state.
pub fn run_scenario(scenario: &ScenarioFile) -> Result<ScenarioReport, ScenarioError> {
    let mut session = GameSession::new(
        scenario.config.clone(),
        Box::new(MemoryHighScoreStore::new()),
        scenario.seed,
    )?;

    let mut moves = 0u32;
    let mut breakers_earned = 0u32;
    let mut breakers_spent = 0u32;

    // The opening move: no valid flags are set yet, so pick from every
    // affordable node (with zero breakers that means every non-data node).
    let opening: Vec<NodeId> = session
        .network()
        .node_ids()
        .iter()
        .copied()
        .filter(|&id| !flags_of(&session, id).breakable)
        .collect();
    let mut next = pick(&session, &opening, scenario.policy);

    // Bounded by the node count: every accepted move consumes a node.
    for _ in 0..session.network().len() {
        let Some(node) = next else {
            break;
        };
        let flags = flags_of(&session, node);
        if flags.breaker {
            breakers_earned += 1;
        } else if flags.breakable {
            breakers_spent += 1;
        }

        session.handle_node_click(node);
        session.finish_processing();
        moves += 1;

        if session.is_terminal() {
            break;
        }
        next = pick(&session, &session.valid_moves(), scenario.policy);
    }

    let Some(outcome) = session.outcome() else {
        return Err(ScenarioError::DidNotTerminate {
            id: scenario.id.clone(),
        });
    };

    let score = session.score();
    Ok(ScenarioReport {
        scenario_id: scenario.id.clone(),
        outcome,
        score,
        moves,
        breakers_earned,
        breakers_spent,
        new_high_score: score > 0 && session.high_score() == score,
    })
}

fn flags_of(session: &GameSession, id: NodeId) -> NodeFlags {
    session
        .network()
        .node(id)
        .map(|data| data.flags)
        .unwrap_or_default()
}

/// Pick the policy's favorite candidate. Ties resolve to construction order
/// because `min_by_key` keeps the first minimum.
fn pick(session: &GameSession, candidates: &[NodeId], policy: Policy) -> Option<NodeId> {
    candidates
        .iter()
        .copied()
        .min_by_key(|&id| rank(flags_of(session, id), policy))
}

fn rank(flags: NodeFlags, policy: Policy) -> u8 {
    match policy {
        Policy::FirstValid => 0,
        Policy::PreferBreakers => {
            if flags.breaker {
                0
            } else if flags.breakable {
                1
            } else {
                2
            }
        }
        Policy::PreferNormal => {
            if !flags.breaker && !flags.breakable {
                0
            } else if flags.breaker {
                1
            } else {
                2
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ScenarioManager
// ---------------------------------------------------------------------------

/// Manages the demo gallery: loads the manifest, resolves scenario files,
/// and runs them headlessly.
pub struct ScenarioManager {
    scenarios_dir: PathBuf,
    manifest: ScenarioManifest,
}

impl ScenarioManager {
    /// Create a manager by loading the manifest from `scenarios_dir`.
    pub fn new(scenarios_dir: &Path) -> Result<Self, ScenarioError> {
        let manifest = load_manifest(scenarios_dir)?;
        Ok(Self {
            scenarios_dir: scenarios_dir.to_path_buf(),
            manifest,
        })
    }

    /// All scenario entries from the manifest.
    pub fn scenarios(&self) -> &[ScenarioEntry] {
        &self.manifest.scenarios
    }

    /// Gallery title from the manifest.
    pub fn gallery_title(&self) -> &str {
        &self.manifest.gallery_title
    }

    /// Gallery description from the manifest.
    pub fn gallery_description(&self) -> &str {
        &self.manifest.gallery_description
    }

    /// Load a scenario file by its manifest ID.
    pub fn load(&self, scenario_id: &str) -> Result<ScenarioFile, ScenarioError> {
        let entry = self
            .manifest
            .scenarios
            .iter()
            .find(|entry| entry.id == scenario_id)
            .ok_or_else(|| ScenarioError::ScenarioNotFound {
                id: scenario_id.to_string(),
            })?;
        load_scenario_file(&self.scenarios_dir.join(&entry.path))
    }

    /// Load and run a scenario by its manifest ID.
    pub fn run(&self, scenario_id: &str) -> Result<ScenarioReport, ScenarioError> {
        let scenario = self.load(scenario_id)?;
        run_scenario(&scenario)
    }

    /// Run every scenario in the manifest, in listed order.
    pub fn run_all(&self) -> Result<Vec<ScenarioReport>, ScenarioError> {
        self.manifest
            .scenarios
            .iter()
            .map(|entry| self.run(&entry.id))
            .collect()
    }
}
