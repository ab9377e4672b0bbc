//! The game session: orchestrates clicks through the node network and the
//! bookkeeping state, and owns the single terminal-resolution entry point.
//!
//! # Click pipeline
//!
//! Each accepted [`GameSession::handle_node_click`] runs:
//!
//! 1. **Entry guards** -- terminal phase, processing lock, move legality;
//!    any rejection is a silent no-op with zero state change.
//! 2. **Lock** -- `processing` set true; previously hidden nodes released.
//! 3. **Transition** -- exactly one score/resource change by node category
//!    (data node spends a breaker, breaker node grants one, normal node
//!    scores only); the first data-node traversal starts the trace.
//! 4. **Bookkeeping** -- node flagged out of play, path extended, path
//!    segment credited to the trace pool.
//! 5. **Recompute** -- valid moves from the new position; an empty set
//!    resolves the terminal outcome through the decision table.
//! 6. **Delivery** -- buffered events go out to listeners in batch.
//!
//! # The processing lock
//!
//! `processing` exists because presentation effects (camera tweens, fades)
//! are asynchronous relative to the synchronous state transition here. The
//! lock is set when a click is accepted and cleared only by
//! [`GameSession::finish_processing`], called by the presentation layer when
//! its animations complete -- never by a timer inside the core.
//!
//! # Terminal resolution
//!
//! Move exhaustion and trace exhaustion both funnel into one private
//! resolver, so win/lose bookkeeping (high score, outcome flags, events)
//! cannot diverge between the two paths.

use crate::config::{ConfigError, GameConfig, Ticks};
use crate::event::{Event, EventBus};
use crate::id::NodeId;
use crate::network::NodeNetwork;
use crate::node::NodeKind;
use crate::query::{NodeView, PathSegment, SessionView};
use crate::rng::SimRng;
use crate::state::{GameState, Outcome, StuckReason, decide_outcome};
use crate::store::HighScoreStore;
use crate::trace::{TraceState, TraceTick};
use serde::{Deserialize, Serialize};

/// Phase of the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No node selected yet.
    Idle,
    /// At least one node selected; traversal underway.
    Active,
    /// Win or loss reached; input is ignored until reset.
    Terminal,
}

/// Result of a click, for callers that care whether input was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The move was accepted and applied.
    Accepted,
    /// The input was ignored: illegal move, processing lock, or terminal
    /// phase. No state changed.
    Ignored,
    /// The move was accepted and ended the session.
    Terminal(Outcome),
}

/// One full game session over a generated node network.
pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) network: NodeNetwork,
    pub(crate) state: GameState,
    pub(crate) trace: TraceState,
    pub(crate) phase: SessionPhase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) rng: SimRng,
    /// Typed event bus; the presentation layer registers listeners here.
    pub event_bus: EventBus,
    pub(crate) store: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("outcome", &self.outcome)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Build a session: validate the configuration, seed the RNG, generate
    /// the network. The only failing path in the whole engine.
    pub fn new(
        config: GameConfig,
        store: Box<dyn HighScoreStore>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SimRng::new(seed);
        let network = NodeNetwork::generate(&config, &mut rng)?;
        let state = GameState::new(store.as_ref());
        let trace = TraceState::new(config.trace_interval);
        Ok(Self {
            config,
            network,
            state,
            trace,
            phase: SessionPhase::Idle,
            outcome: None,
            rng,
            event_bus: EventBus::default(),
            store,
        })
    }

    // -----------------------------------------------------------------------
    // Click handling
    // -----------------------------------------------------------------------

    /// Handle a selection intent on `node`. See the module docs for the
    /// pipeline. Rejections are silent no-ops: an accidental tap on an
    /// invalid target must be free of side effects.
    pub fn handle_node_click(&mut self, node: NodeId) -> ClickOutcome {
        if !self.is_legal_click(node) {
            return ClickOutcome::Ignored;
        }

        self.state.set_processing(true, &mut self.event_bus);
        self.state.clear_hidden_nodes(&mut self.event_bus);

        let Some(kind) = self.network.node(node).map(|data| data.kind()) else {
            // Unreachable past the entry guard.
            return ClickOutcome::Ignored;
        };

        match kind {
            NodeKind::Breakable => {
                let count = self.state.breaker_count();
                self.state.set_breaker_count(count - 1, &mut self.event_bus);
                self.state.set_score(
                    self.state.score() + self.config.rewards.breakable,
                    &mut self.event_bus,
                );
                if !self.state.is_traced() {
                    self.state.set_traced(true);
                    self.trace.activate();
                    self.event_bus.emit(Event::TraceStarted {
                        interval: self.trace.interval(),
                    });
                }
            }
            NodeKind::Breaker => {
                let count = self.state.breaker_count();
                self.state.set_breaker_count(count + 1, &mut self.event_bus);
                self.state.set_score(
                    self.state.score() + self.config.rewards.breaker,
                    &mut self.event_bus,
                );
            }
            NodeKind::Normal => {
                self.state.set_score(
                    self.state.score() + self.config.rewards.normal,
                    &mut self.event_bus,
                );
            }
        }

        let previous = self.state.path().last().copied();
        self.network.remove_node(node);
        self.state.push_path(node);
        self.event_bus.emit(Event::NodeSelected { node });
        if let Some(prev) = previous {
            self.trace.add_segment();
            self.event_bus.emit(Event::PathExtended {
                from: prev,
                to: node,
            });
        }
        self.phase = SessionPhase::Active;

        let candidates = self
            .network
            .find_valid_next_moves(node, self.state.breaker_count());
        self.event_bus.emit(Event::ValidMovesChanged {
            count: candidates.len() as u32,
        });

        let outcome = if candidates.is_empty() {
            let decided = decide_outcome(
                self.network.has_unreached_breakable(),
                self.state.breaker_count(),
            );
            self.resolve_terminal(decided);
            ClickOutcome::Terminal(decided)
        } else {
            ClickOutcome::Accepted
        };

        self.event_bus.deliver();
        outcome
    }

    /// Whether a click on `node` would be accepted right now.
    ///
    /// Illegal means: terminal phase, processing lock held, node already
    /// selected, node not flagged valid while a path exists, or a data node
    /// while no breaker is held (which also covers the first move -- it can
    /// never land on an unaffordable data node).
    fn is_legal_click(&self, node: NodeId) -> bool {
        if self.phase == SessionPhase::Terminal || self.state.is_processing() {
            return false;
        }
        let Some(data) = self.network.node(node) else {
            return false;
        };
        if data.flags.selected {
            return false;
        }
        if !self.state.path().is_empty() && !data.flags.valid {
            return false;
        }
        if data.flags.breakable && self.state.breaker_count() == 0 {
            return false;
        }
        true
    }

    // -----------------------------------------------------------------------
    // External signals
    // -----------------------------------------------------------------------

    /// Release the processing lock. Called by the presentation layer once
    /// its transition animations have completed.
    pub fn finish_processing(&mut self) {
        self.state.set_processing(false, &mut self.event_bus);
        self.event_bus.deliver();
    }

    /// Advance the trace clock by `dt` injected ticks. May resolve the
    /// session as lost when the last drawn segment decays.
    pub fn advance_trace(&mut self, dt: Ticks) {
        if self.is_terminal() {
            return;
        }
        match self.trace.advance(dt) {
            TraceTick::Idle => {}
            TraceTick::Decayed { remaining, .. } => {
                self.event_bus.emit(Event::TraceAdvanced {
                    segments_remaining: remaining,
                });
                self.event_bus.deliver();
            }
            TraceTick::Exhausted => {
                self.event_bus.emit(Event::TraceAdvanced {
                    segments_remaining: 0,
                });
                self.resolve_terminal(Outcome::Stuck(StuckReason::Traced));
                self.event_bus.deliver();
            }
        }
    }

    /// Flag a node as visually occluded (faded out by the presentation
    /// layer). The set is flushed on the next accepted click.
    pub fn hide_node(&mut self, node: NodeId) {
        self.state.add_hidden_node(node, &mut self.event_bus);
        self.event_bus.deliver();
    }

    /// Un-flag a previously hidden node.
    pub fn reveal_node(&mut self, node: NodeId) {
        self.state.remove_hidden_node(node, &mut self.event_bus);
        self.event_bus.deliver();
    }

    /// Mark the one-time intro sequence as done.
    pub fn mark_initialized(&mut self) {
        self.state.mark_initialized();
    }

    /// Start a fresh session over a newly generated network. The RNG stream
    /// continues, so consecutive resets produce different layouts; the
    /// high score is reloaded and `initialized` stays true.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.network = NodeNetwork::generate(&self.config, &mut self.rng)?;
        self.trace = TraceState::new(self.config.trace_interval);
        self.state.reset(self.store.as_ref(), &mut self.event_bus);
        self.outcome = None;
        self.phase = SessionPhase::Idle;
        self.event_bus.deliver();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal resolution (single writer)
    // -----------------------------------------------------------------------

    /// The one entry point for ending a session. Every terminal transition
    /// -- move exhaustion or trace exhaustion -- goes through here.
    fn resolve_terminal(&mut self, outcome: Outcome) {
        let new_high_score = self.state.record_final_score(self.store.as_mut());
        let score = self.state.score();
        match outcome {
            Outcome::Won => {
                self.state.set_completed(true);
                self.event_bus.emit(Event::GameWon {
                    score,
                    new_high_score,
                });
            }
            Outcome::Stuck(reason) => {
                self.state.set_completed(false);
                self.event_bus.emit(Event::GameOver {
                    reason,
                    score,
                    new_high_score,
                });
            }
        }
        self.state.set_valid_moves_left(false);
        self.state.set_processing(false, &mut self.event_bus);
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Terminal;
    }

    // -----------------------------------------------------------------------
    // Accessors & snapshots
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn network(&self) -> &NodeNetwork {
        &self.network
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Terminal outcome, once one has been resolved.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.state.score()
    }

    pub fn high_score(&self) -> u32 {
        self.state.high_score()
    }

    pub fn breaker_count(&self) -> u32 {
        self.state.breaker_count()
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == SessionPhase::Terminal
    }

    /// The traversal path so far, in order.
    pub fn selected_path(&self) -> &[NodeId] {
        self.state.path()
    }

    /// Legal next moves from the current position, in construction order.
    /// Empty before the first move (any affordable node is legal then).
    pub fn valid_moves(&self) -> Vec<NodeId> {
        self.network.current_valid_moves()
    }

    /// Owned aggregate view of the session.
    pub fn snapshot(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            score: self.state.score(),
            high_score: self.state.high_score(),
            breaker_count: self.state.breaker_count(),
            path: self.state.path().to_vec(),
            traced: self.state.is_traced(),
            segments_remaining: self.trace.segments_remaining(),
            outcome: self.outcome,
        }
    }

    /// Owned views of every node, in construction order.
    pub fn node_views(&self) -> Vec<NodeView> {
        self.network
            .node_ids()
            .iter()
            .filter_map(|&id| {
                self.network.node(id).map(|data| NodeView {
                    id,
                    grid: data.grid,
                    world: data.world,
                    flags: data.flags,
                })
            })
            .collect()
    }

    /// The drawn path segments in traversal order.
    pub fn path_segments(&self) -> Vec<PathSegment> {
        self.state
            .path()
            .windows(2)
            .map(|pair| PathSegment {
                from: pair[0],
                to: pair[1],
            })
            .collect()
    }
}
