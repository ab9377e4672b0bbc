//! The trace mechanic: activation on the first data-node traversal,
//! interval-driven segment decay, and the forced loss when the trace
//! consumes every drawn segment.

use nodebreaker_core::event::{Event, EventKind};
use nodebreaker_core::session::ClickOutcome;
use nodebreaker_core::state::{Outcome, StuckReason};
use nodebreaker_core::test_utils::*;

/// Rig a 3^3 session with a breaker at the origin and a data node beside
/// it, then walk: plain -> breaker -> data. Three moves, two drawn segments.
fn traced_session() -> nodebreaker_core::session::GameSession {
    let mut session = fixed_session(31);
    clear_special(&mut session);

    let breaker = node_at(&session, 0, 0, 1);
    let data = node_at(&session, 0, 0, 2);
    set_breaker(&mut session, breaker, true);
    set_breakable(&mut session, data, true);

    for node in [node_at(&session, 0, 0, 0), breaker, data] {
        assert_ne!(session.handle_node_click(node), ClickOutcome::Ignored);
        session.finish_processing();
    }
    assert!(session.state().is_traced());
    session
}

#[test]
fn trace_is_inert_until_a_data_node_is_touched() {
    let mut session = fixed_session(31);
    clear_special(&mut session);

    session.handle_node_click(node_at(&session, 0, 0, 0));
    session.finish_processing();
    session.handle_node_click(node_at(&session, 0, 0, 1));
    session.finish_processing();

    // A segment exists, but without a data-node touch nothing decays.
    session.advance_trace(1_000_000);
    assert!(!session.is_terminal());
    assert_eq!(session.snapshot().segments_remaining, 1);
}

#[test]
fn trace_decay_emits_progress_events() {
    let mut session = traced_session();
    assert_eq!(session.snapshot().segments_remaining, 2);

    let log = EventLog::attach(&mut session, &[EventKind::TraceAdvanced]);
    let interval = session.config().trace_interval;

    session.advance_trace(interval);
    assert_eq!(
        log.take(),
        vec![Event::TraceAdvanced {
            segments_remaining: 1
        }]
    );
    assert!(!session.is_terminal());
}

#[test]
fn exhausting_all_segments_loses_the_game() {
    let mut session = traced_session();
    let log = EventLog::attach(&mut session, &[EventKind::GameOver, EventKind::GameWon]);
    let interval = session.config().trace_interval;

    session.advance_trace(interval * 2);

    assert!(session.is_terminal());
    assert_eq!(session.outcome(), Some(Outcome::Stuck(StuckReason::Traced)));

    let events = log.take();
    assert_eq!(events.len(), 1, "one terminal event, no win/lose divergence");
    assert!(matches!(
        events[0],
        Event::GameOver {
            reason: StuckReason::Traced,
            ..
        }
    ));
}

#[test]
fn trace_time_is_a_no_op_after_terminal() {
    let mut session = traced_session();
    let interval = session.config().trace_interval;
    session.advance_trace(interval * 2);
    assert!(session.is_terminal());

    let score = session.score();
    session.advance_trace(interval * 10);
    assert_eq!(session.score(), score);
    assert_eq!(session.outcome(), Some(Outcome::Stuck(StuckReason::Traced)));
}

#[test]
fn new_moves_keep_feeding_the_trace_pool() {
    let mut session = traced_session();
    let interval = session.config().trace_interval;

    // Burn one of the two segments.
    session.advance_trace(interval);
    assert_eq!(session.snapshot().segments_remaining, 1);

    // Another accepted move credits another segment.
    let next = session.valid_moves()[0];
    assert_ne!(session.handle_node_click(next), ClickOutcome::Ignored);
    session.finish_processing();
    assert_eq!(session.snapshot().segments_remaining, 2);
}
