//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::GameConfig;
use crate::event::{Event, EventKind};
use crate::id::NodeId;
use crate::lattice::GridPos;
use crate::session::GameSession;
use crate::store::MemoryHighScoreStore;
use std::cell::RefCell;
use std::rc::Rc;

// ===========================================================================
// Session builders
// ===========================================================================

/// A small 3^3 configuration that generates quickly and always satisfies
/// the connectivity invariant.
pub fn test_config() -> GameConfig {
    GameConfig {
        size: 3,
        breakable_count: 3,
        breaker_count: 2,
        ..Default::default()
    }
}

/// Session over [`test_config`] with an in-memory store.
pub fn fixed_session(seed: u64) -> GameSession {
    session_with(test_config(), seed)
}

/// Session over an arbitrary config with an in-memory store.
pub fn session_with(config: GameConfig, seed: u64) -> GameSession {
    GameSession::new(config, Box::new(MemoryHighScoreStore::new()), seed)
        .expect("test config must be valid")
}

// ===========================================================================
// Node lookup & flag rigging
// ===========================================================================

/// Node id at a lattice coordinate. Panics on out-of-bounds (test-only).
pub fn node_at(session: &GameSession, x: i32, y: i32, z: i32) -> NodeId {
    session
        .network()
        .node_at(GridPos::new(x, y, z))
        .expect("coordinate in bounds")
}

/// First node in construction order with no special flag -- a safe opening
/// move regardless of the generated layout.
pub fn first_plain_node(session: &GameSession) -> NodeId {
    session
        .node_views()
        .iter()
        .find(|v| !v.flags.breakable && !v.flags.breaker)
        .map(|v| v.id)
        .expect("a generated network always keeps plain nodes")
}

/// Force a node's breakable flag, bypassing assignment.
pub fn set_breakable(session: &mut GameSession, id: NodeId, value: bool) {
    if let Some(node) = session.network.node_mut(id) {
        node.flags.breakable = value;
        if value {
            node.flags.breaker = false;
        }
    }
}

/// Force a node's breaker flag, bypassing assignment.
pub fn set_breaker(session: &mut GameSession, id: NodeId, value: bool) {
    if let Some(node) = session.network.node_mut(id) {
        node.flags.breaker = value;
        if value {
            node.flags.breakable = false;
        }
    }
}

/// Strip every special flag, leaving a lattice of plain nodes to rig.
pub fn clear_special(session: &mut GameSession) {
    let ids: Vec<NodeId> = session.network.node_ids().to_vec();
    for id in ids {
        if let Some(node) = session.network.node_mut(id) {
            node.flags.breakable = false;
            node.flags.breaker = false;
        }
    }
}

/// Flag a node as already traversed, without going through a click.
pub fn mark_selected(session: &mut GameSession, id: NodeId) {
    session.network.remove_node(id);
}

// ===========================================================================
// Event collection
// ===========================================================================

/// Collects delivered events for assertions.
///
/// ```rust,ignore
/// let log = EventLog::attach(&mut session, &[EventKind::ScoreChanged]);
/// session.handle_node_click(node);
/// assert_eq!(log.take().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    /// Register a listener for each of `kinds` on the session's bus.
    pub fn attach(session: &mut GameSession, kinds: &[EventKind]) -> Self {
        let log = Self::default();
        for &kind in kinds {
            let sink = Rc::clone(&log.events);
            session
                .event_bus
                .on(kind, Box::new(move |event| sink.borrow_mut().push(event.clone())));
        }
        log
    }

    /// Drain and return everything collected so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of events collected so far without draining.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
