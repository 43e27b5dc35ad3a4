//! Integration tests for the engine facade: store-backed commands, views, lifecycle, concurrency.

use shuttle_draw::{
    DrawView, Engine, Format, MatchState, Participant, SlotView, TournamentError, TournamentId,
    TournamentStatus, TournamentStore,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use uuid::Uuid;

fn roster(n: usize) -> Vec<Participant> {
    (0..n).map(|i| Participant::new(format!("P{i}"))).collect()
}

fn setup(format: Format, players: usize) -> (Engine, TournamentStore, TournamentId) {
    let engine = Engine::default();
    let store = TournamentStore::new();
    let id = engine.create_tournament(&store, "Autumn Open", format).id;
    engine.build_bracket(&store, id, roster(players)).unwrap();
    (engine, store, id)
}

#[test]
fn bracket_view_joins_names_and_names_rounds() {
    let (engine, store, id) = setup(Format::Knockout, 5);
    let view = engine.bracket_view(&store, id).unwrap();
    assert_eq!(view.status, TournamentStatus::Upcoming);
    assert_eq!(view.ready_matches.len(), 2);
    assert!(!view.completion_ready);

    let DrawView::Knockout { rounds, champion } = view.draw else {
        panic!("expected knockout view");
    };
    assert!(champion.is_none());
    let names: Vec<_> = rounds.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Quarter-finals", "Semi-finals", "Final"]);

    let first = &rounds[0].matches[0];
    assert_eq!(first.state, MatchState::Walkover);
    assert!(matches!(&first.side_1, SlotView::Participant { name, .. } if name == "P0"));
    assert_eq!(first.side_2, SlotView::Bye);
    assert_eq!(first.winner.as_ref().map(|w| w.name.as_str()), Some("P0"));

    let last = &rounds[2].matches[0];
    assert_eq!(last.state, MatchState::Pending);
    assert_eq!(
        last.side_1,
        SlotView::AwaitingWinner {
            match_id: rounds[1].matches[0].id
        }
    );
}

#[test]
fn pending_matches_follow_results() {
    let (engine, store, id) = setup(Format::Knockout, 4);
    let pending = engine.pending_matches(&store, id).unwrap();
    assert_eq!(pending.len(), 2);

    engine
        .record_result(&store, id, pending[0], 21, 11, None)
        .unwrap();
    engine
        .record_result(&store, id, pending[1], 21, 11, None)
        .unwrap();
    let pending = engine.pending_matches(&store, id).unwrap();
    assert_eq!(pending.len(), 1);

    let view = engine
        .record_result(&store, id, pending[0], 21, 19, None)
        .unwrap();
    assert_eq!(view.status, TournamentStatus::Completed);
    assert!(view.ready_matches.is_empty());
    let DrawView::Knockout { champion, .. } = view.draw else {
        panic!("expected knockout view");
    };
    assert_eq!(champion.map(|c| c.name), Some("P0".to_string()));
}

#[test]
fn stale_version_is_a_retryable_conflict() {
    let (engine, store, id) = setup(Format::Knockout, 4);
    let view = engine.bracket_view(&store, id).unwrap();
    let version = view.version;

    engine
        .record_result(&store, id, view.ready_matches[0], 21, 5, Some(version))
        .unwrap();
    let err = engine
        .record_result(&store, id, view.ready_matches[1], 21, 5, Some(version))
        .unwrap_err();
    assert_eq!(
        err,
        TournamentError::Conflict {
            expected: version,
            actual: version + 1
        }
    );
    assert!(err.is_retryable());

    let fresh = engine.bracket_view(&store, id).unwrap();
    engine
        .record_result(&store, id, view.ready_matches[1], 21, 5, Some(fresh.version))
        .unwrap();
}

#[test]
fn failed_command_leaves_no_trace() {
    let (engine, store, id) = setup(Format::Knockout, 4);
    let before = store.get(id).unwrap();
    let match_id = engine.pending_matches(&store, id).unwrap()[0];
    assert!(engine
        .record_result(&store, id, match_id, 21, 21, None)
        .is_err());
    let after = store.get(id).unwrap();
    assert_eq!(after.version, before.version);
    assert_eq!(after.status, TournamentStatus::Upcoming);
    assert_eq!(after.draw, before.draw);
}

#[test]
fn concurrent_submissions_record_exactly_once() {
    let (engine, store, id) = setup(Format::Knockout, 8);
    let match_id = engine.pending_matches(&store, id).unwrap()[0];
    let accepted = AtomicUsize::new(0);
    let rejected = AtomicUsize::new(0);

    thread::scope(|s| {
        for i in 0..8 {
            let (engine, store, accepted, rejected) = (&engine, &store, &accepted, &rejected);
            s.spawn(move || {
                match engine.record_result(store, id, match_id, 21, i, None) {
                    Ok(_) => accepted.fetch_add(1, Ordering::SeqCst),
                    Err(TournamentError::AlreadyRecorded(_)) => rejected.fetch_add(1, Ordering::SeqCst),
                    Err(e) => panic!("unexpected error: {e}"),
                };
            });
        }
    });

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(rejected.load(Ordering::SeqCst), 7);
}

#[test]
fn lifecycle_moves_forward_only() {
    let (engine, store, id) = setup(Format::Knockout, 4);
    let t = engine
        .transition_status(&store, id, TournamentStatus::InProgress)
        .unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);

    assert_eq!(
        engine
            .transition_status(&store, id, TournamentStatus::Upcoming)
            .map(|t| t.status),
        Err(TournamentError::InvalidStateTransition {
            from: TournamentStatus::InProgress,
            to: TournamentStatus::Upcoming
        })
    );
    // Knockout tournaments only complete through their final.
    assert!(matches!(
        engine.transition_status(&store, id, TournamentStatus::Completed),
        Err(TournamentError::InvalidStateTransition { .. })
    ));
    assert!(matches!(
        engine.transition_status(&store, id, TournamentStatus::InProgress),
        Err(TournamentError::InvalidStateTransition { .. })
    ));
}

#[test]
fn cannot_start_without_a_draw_or_skip_ahead() {
    let engine = Engine::default();
    let store = TournamentStore::new();
    let id = engine.create_tournament(&store, "Later", Format::RoundRobin).id;
    assert!(matches!(
        engine.transition_status(&store, id, TournamentStatus::InProgress),
        Err(TournamentError::NotBuilt)
    ));
    assert!(matches!(
        engine.transition_status(&store, id, TournamentStatus::Completed),
        Err(TournamentError::InvalidStateTransition { .. })
    ));
}

#[test]
fn round_robin_view_carries_standings() {
    let (engine, store, id) = setup(Format::RoundRobin, 4);
    let view = engine.bracket_view(&store, id).unwrap();
    assert_eq!(view.ready_matches.len(), 6);
    let DrawView::RoundRobin { fixtures, standings } = view.draw else {
        panic!("expected round robin view");
    };
    assert_eq!(fixtures.len(), 6);
    assert!(fixtures.iter().all(|f| f.state == MatchState::Ready));
    assert_eq!(standings.len(), 4);

    for match_id in engine.pending_matches(&store, id).unwrap() {
        engine.record_result(&store, id, match_id, 21, 17, None).unwrap();
    }
    let view = engine.bracket_view(&store, id).unwrap();
    assert!(view.completion_ready);
    assert_eq!(view.status, TournamentStatus::InProgress);
    let t = engine
        .transition_status(&store, id, TournamentStatus::Completed)
        .unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(engine.standings(&store, id).unwrap().len(), 4);
}

#[test]
fn removed_tournament_is_gone() {
    let (engine, store, id) = setup(Format::Knockout, 4);
    engine.remove_tournament(&store, id).unwrap();
    assert!(store.is_empty());
    assert_eq!(
        engine.bracket_view(&store, id).map(|_| ()),
        Err(TournamentError::TournamentNotFound(id))
    );
    assert_eq!(
        engine.remove_tournament(&store, id).map(|_| ()),
        Err(TournamentError::TournamentNotFound(id))
    );
}

#[test]
fn rebuild_through_engine_is_rejected() {
    let (engine, store, id) = setup(Format::RoundRobin, 3);
    assert_eq!(
        engine.build_bracket(&store, id, roster(3)).map(|_| ()),
        Err(TournamentError::AlreadyBuilt)
    );
    let unknown = Uuid::new_v4();
    assert_eq!(
        engine.build_bracket(&store, unknown, roster(3)).map(|_| ()),
        Err(TournamentError::TournamentNotFound(unknown))
    );
}
