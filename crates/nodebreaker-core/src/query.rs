//! Read-only query API for inspecting session state.
//!
//! Provides snapshot types that aggregate engine state into convenient views
//! for rendering, UI, and FFI consumers. All types are owned copies -- no
//! references into internal session storage.

use crate::id::NodeId;
use crate::lattice::GridPos;
use crate::node::NodeFlags;
use crate::session::SessionPhase;
use crate::state::Outcome;

/// An aggregated, read-only view of a single node.
///
/// The presentation layer pairs these with its own opaque mesh handles,
/// kept in a `SecondaryMap<NodeId, _>` on its side of the boundary.
#[derive(Debug, Clone)]
pub struct NodeView {
    /// The node's arena key.
    pub id: NodeId,
    /// Integer lattice coordinate.
    pub grid: GridPos,
    /// World-space position (centered, spacing-scaled).
    pub world: [f32; 3],
    /// Current status flags.
    pub flags: NodeFlags,
}

/// One drawn segment of the traversal path, in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
    pub from: NodeId,
    pub to: NodeId,
}

/// An aggregated, read-only view of the whole session.
#[derive(Debug, Clone)]
pub struct SessionView {
    /// Current phase of the session state machine.
    pub phase: SessionPhase,
    pub score: u32,
    pub high_score: u32,
    pub breaker_count: u32,
    /// The traversal path in insertion order.
    pub path: Vec<NodeId>,
    /// Whether the trace escalation is running.
    pub traced: bool,
    /// Drawn segments the trace has not consumed yet.
    pub segments_remaining: u32,
    /// Terminal outcome, once one has been resolved.
    pub outcome: Option<Outcome>,
}
