//! Per-node data: lattice position and status flags.

use crate::lattice::GridPos;
use serde::{Deserialize, Serialize};

/// Status flags for a single node.
///
/// Flags are mutually non-exclusive except where the rules imply otherwise:
/// `breakable` and `breaker` never coexist because breakers are assigned
/// from the non-breakable pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    /// The node has been traversed and is out of play.
    pub visited: bool,
    /// The node is part of the selection path.
    pub selected: bool,
    /// The node is a legal next move right now.
    pub valid: bool,
    /// A data node: traversing it costs one breaker.
    pub breakable: bool,
    /// Traversing this node grants one breaker.
    pub breaker: bool,
}

/// Category of a node for the score/resource transition on traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Normal,
    Breaker,
    Breakable,
}

/// Per-node data stored in the network arena.
///
/// Created once during network construction. Flags mutate throughout a
/// session; the position fields never do. A traversed node stays in the
/// arena (its neighbors keep referencing it) -- exclusion from play is the
/// `selected`/`visited` flags, not deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Integer lattice coordinate -- the node's identity within the lattice.
    pub grid: GridPos,
    /// World-space position for the presentation layer.
    pub world: [f32; 3],
    /// Current status flags.
    pub flags: NodeFlags,
}

impl NodeData {
    /// Create a node at the given lattice coordinate.
    pub fn new(grid: GridPos, world: [f32; 3]) -> Self {
        Self {
            grid,
            world,
            flags: NodeFlags::default(),
        }
    }

    /// The node's category for scoring. Breakable is checked first; by
    /// construction the two special flags never overlap.
    pub fn kind(&self) -> NodeKind {
        if self.flags.breakable {
            NodeKind::Breakable
        } else if self.flags.breaker {
            NodeKind::Breaker
        } else {
            NodeKind::Normal
        }
    }
}
