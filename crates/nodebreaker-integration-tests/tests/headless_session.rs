//! Headless session flows: rejection semantics, the breaker economy, and
//! mid-session reset.

use nodebreaker_core::config::GameConfig;
use nodebreaker_core::event::{Event, EventKind};
use nodebreaker_core::session::{ClickOutcome, GameSession};
use nodebreaker_core::store::{HIGH_SCORE_KEY, HighScoreStore, MemoryHighScoreStore};
use nodebreaker_core::test_utils::*;

/// Spec scenario: with zero breakers, a click on a data node is rejected
/// outright -- score, resources, and path are all untouched.
#[test]
fn opening_click_on_data_node_is_a_silent_no_op() {
    let mut session = fixed_session(3);
    let data_node = session
        .node_views()
        .iter()
        .find(|v| v.flags.breakable)
        .map(|v| v.id)
        .unwrap();

    assert_eq!(session.breaker_count(), 0);
    assert_eq!(session.handle_node_click(data_node), ClickOutcome::Ignored);

    assert_eq!(session.score(), 0);
    assert_eq!(session.breaker_count(), 0);
    assert!(session.selected_path().is_empty());
    assert!(!session.is_processing());
}

/// Spec scenario: breaker then adjacent data node. Scores 5 then 10, the
/// breaker count goes 0 -> 1 -> 0, and the first data traversal starts the
/// trace.
#[test]
fn breaker_funds_an_adjacent_data_node() {
    let mut session = fixed_session(8);
    clear_special(&mut session);

    let breaker = node_at(&session, 0, 0, 0);
    let data = node_at(&session, 0, 0, 1);
    set_breaker(&mut session, breaker, true);
    set_breakable(&mut session, data, true);

    let log = EventLog::attach(&mut session, &[EventKind::TraceStarted]);

    assert_eq!(session.handle_node_click(breaker), ClickOutcome::Accepted);
    assert_eq!(session.score(), 5);
    assert_eq!(session.breaker_count(), 1);
    assert!(!session.state().is_traced());
    session.finish_processing();

    assert_eq!(session.handle_node_click(data), ClickOutcome::Accepted);
    assert_eq!(session.score(), 15);
    assert_eq!(session.breaker_count(), 0);
    assert!(session.state().is_traced());
    assert_eq!(log.take().len(), 1, "first data traversal starts the trace");
}

/// The trace only starts once; a second data node does not re-announce it.
#[test]
fn second_data_node_does_not_restart_the_trace() {
    let mut session = fixed_session(8);
    clear_special(&mut session);

    let first_breaker = node_at(&session, 0, 0, 0);
    let data_a = node_at(&session, 0, 0, 1);
    let second_breaker = node_at(&session, 0, 0, 2);
    let data_b = node_at(&session, 0, 1, 2);
    set_breaker(&mut session, first_breaker, true);
    set_breakable(&mut session, data_a, true);
    set_breaker(&mut session, second_breaker, true);
    set_breakable(&mut session, data_b, true);

    let log = EventLog::attach(&mut session, &[EventKind::TraceStarted]);

    for node in [first_breaker, data_a, second_breaker, data_b] {
        assert_ne!(session.handle_node_click(node), ClickOutcome::Ignored);
        session.finish_processing();
    }

    assert_eq!(log.take().len(), 1);
    assert_eq!(session.breaker_count(), 0);
    assert_eq!(session.score(), 30);
}

/// While the processing lock is held, every input is ignored; releasing it
/// through finish_processing reopens the session.
#[test]
fn input_is_ignored_until_presentation_finishes() {
    let mut session = fixed_session(13);
    let start = first_plain_node(&session);

    session.handle_node_click(start);
    assert!(session.is_processing());

    let next = session.valid_moves()[0];
    assert_eq!(session.handle_node_click(next), ClickOutcome::Ignored);

    session.finish_processing();
    assert_eq!(session.handle_node_click(next), ClickOutcome::Accepted);
}

/// Spec scenario: reset mid-session restores initial values while keeping
/// the one-time initialization flag.
#[test]
fn mid_session_reset_restores_initial_state() {
    let mut session = fixed_session(21);
    session.mark_initialized();

    let start = first_plain_node(&session);
    session.handle_node_click(start);
    session.finish_processing();
    let next = session.valid_moves()[0];
    session.handle_node_click(next);
    session.finish_processing();

    assert!(session.score() > 0);
    assert_eq!(session.selected_path().len(), 2);

    session.reset().unwrap();

    assert_eq!(session.score(), 0);
    assert_eq!(session.breaker_count(), 0);
    assert!(session.selected_path().is_empty());
    assert!(!session.is_terminal());
    assert!(session.state().is_initialized());
    // The regenerated network is fully back in play.
    assert!(session.node_views().iter().all(|v| !v.flags.visited));
}

/// Reset emits the state-reset event and reloads the persisted high score.
#[test]
fn reset_reloads_high_score_from_the_store() {
    let config = GameConfig {
        size: 2,
        breakable_count: 0,
        breaker_count: 0,
        ..Default::default()
    };
    let mut session =
        GameSession::new(config, Box::new(MemoryHighScoreStore::new()), 5).unwrap();

    // Play the tiny lattice out; with no data nodes the exhaustion is a win.
    let start = first_plain_node(&session);
    session.handle_node_click(start);
    session.finish_processing();
    while !session.is_terminal() {
        let moves = session.valid_moves();
        session.handle_node_click(moves[0]);
        session.finish_processing();
    }
    let final_score = session.score();
    assert!(final_score > 0);

    let log = EventLog::attach(&mut session, &[EventKind::StateReset]);
    session.reset().unwrap();
    assert_eq!(log.take().len(), 1);
    assert_eq!(session.high_score(), final_score);
    assert_eq!(session.score(), 0);
}

/// The injected store sees the high score under the fixed key.
#[test]
fn high_score_lands_in_the_injected_store() {
    let store = MemoryHighScoreStore::with_high_score(1);
    assert_eq!(store.get(HIGH_SCORE_KEY), Some(1));

    let config = GameConfig {
        size: 2,
        breakable_count: 0,
        breaker_count: 0,
        ..Default::default()
    };
    let mut session = GameSession::new(config, Box::new(store), 5).unwrap();

    let start = first_plain_node(&session);
    session.handle_node_click(start);
    session.finish_processing();
    while !session.is_terminal() {
        let moves = session.valid_moves();
        session.handle_node_click(moves[0]);
        session.finish_processing();
    }

    assert!(session.score() > 1);
    assert_eq!(session.high_score(), session.score());
}

/// Events carry the values the presentation layer renders: score and
/// breaker updates arrive in mutation order.
#[test]
fn score_and_breaker_events_track_mutations() {
    let mut session = fixed_session(8);
    clear_special(&mut session);
    let breaker = node_at(&session, 0, 0, 0);
    set_breaker(&mut session, breaker, true);

    let log = EventLog::attach(
        &mut session,
        &[EventKind::ScoreChanged, EventKind::BreakerCountChanged],
    );

    session.handle_node_click(breaker);

    let events = log.take();
    assert!(events.contains(&Event::ScoreChanged { score: 5 }));
    assert!(events.contains(&Event::BreakerCountChanged { count: 1 }));
}
