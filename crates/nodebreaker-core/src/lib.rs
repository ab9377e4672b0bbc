//! Nodebreaker Core -- the puzzle engine for the nodebreaker lattice game.
//!
//! This crate owns everything with rules in it: building the cubic node
//! lattice and its adjacency, guaranteeing the non-breakable subgraph stays
//! connected through random special-node assignment, validating and applying
//! player moves, running the breaker-resource economy, and resolving the
//! terminal win/stuck/lose outcome. Rendering, audio, and UI are external
//! collaborators: they subscribe to typed events and call back into the
//! session's public operations.
//!
//! # Click Pipeline
//!
//! Each accepted [`session::GameSession::handle_node_click`] runs:
//!
//! 1. **Entry guards** -- terminal phase, processing lock, move legality;
//!    rejections are silent no-ops.
//! 2. **Lock** -- the processing flag is set; hidden nodes are released.
//! 3. **Transition** -- exactly one score/resource change by node category.
//! 4. **Bookkeeping** -- path extended, node flagged out of play.
//! 5. **Recompute** -- valid moves from the new position; an empty set
//!    resolves the terminal outcome.
//! 6. **Delivery** -- buffered events are delivered to listeners in batch.
//!
//! # Key Types
//!
//! - [`session::GameSession`] -- orchestrator and public API surface.
//! - [`network::NodeNetwork`] -- lattice arena, adjacency, connectivity
//!   check, and move computation.
//! - [`state::GameState`] -- score, resources, path, lifecycle flags, and
//!   the terminal decision table.
//! - [`trace::TraceState`] -- injected-time decay of drawn path segments.
//! - [`event::EventBus`] -- typed events with per-kind ring buffers.
//! - [`store::HighScoreStore`] -- injected key-value persistence for the
//!   high score.
//! - [`serialize`] -- versioned binary session saves via bitcode.
//!
//! # Determinism
//!
//! All randomness flows through [`rng::SimRng`] (SplitMix64) seeded at
//! session construction, and all time is injected through
//! [`session::GameSession::advance_trace`]. The core never reads a clock,
//! so a seed fully determines a layout and a scripted run.

pub mod config;
#[cfg(feature = "data-loader")]
pub mod data_loader;
pub mod event;
pub mod id;
pub mod lattice;
pub mod network;
pub mod node;
pub mod query;
pub mod rng;
pub mod serialize;
pub mod session;
pub mod state;
pub mod store;
pub mod trace;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
