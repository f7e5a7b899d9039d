//! End-to-end draw flows through the JSON API.

use fp_core::api::handle_command_json;
use fp_core::{
    reset_session_json, session_command_json, session_pump_json, CastingPhase, ManualScheduler,
    ManualSession, SeededSource, SessionConfig, SessionController,
};
use serde_json::Value;
use std::thread;
use std::time::Duration;

fn call(session: &mut ManualSession<SeededSource>, request: &str) -> Value {
    serde_json::from_str(&handle_command_json(session, request)).unwrap()
}

fn seeded(seed: u64) -> ManualSession<SeededSource> {
    let random = SeededSource::new(seed);
    SessionController::new(SessionConfig::default(), random, ManualScheduler::new())
}

#[test]
fn test_elimination_until_one_left() {
    let mut session = seeded(31);
    call(&mut session, r#"{"command":"add_bulk","text":"Andi\nBudi\nCitra\nDewi"}"#);

    let mut winners = Vec::new();
    while session.roster().len() >= 2 {
        let v = call(&mut session, r#"{"command":"start"}"#);
        assert_eq!(v["outcome"], "Applied");
        session.run_to_completion().unwrap();

        let snapshot = session.snapshot();
        assert!(snapshot.result_visible);
        let winner = snapshot.outcome.as_ref().unwrap().winner_name.clone();
        assert_eq!(snapshot.winner().map(|p| p.name.clone()), Some(winner.clone()));
        winners.push(winner);

        let v = call(&mut session, r#"{"command":"remove_winner"}"#);
        assert_eq!(v["snapshot"]["phase"], "Ready");
        assert!(v["snapshot"]["outcome"].is_null());
    }

    assert_eq!(winners.len(), 3);
    winners.sort();
    winners.dedup();
    assert_eq!(winners.len(), 3, "a removed winner can't win again");

    let v = call(&mut session, r#"{"command":"start"}"#);
    assert_eq!(v["outcome"]["Ignored"], "NotEnoughParticipants");
    assert_eq!(v["snapshot"]["readiness"], "NeedsMore");
}

#[test]
fn test_same_seed_same_winners() {
    let draw = |seed| {
        let mut session = seeded(seed);
        call(&mut session, r#"{"command":"add_bulk","text":"A,B,C,D,E,F,G"}"#);
        let mut picks = Vec::new();
        for _ in 0..5 {
            call(&mut session, r#"{"command":"start"}"#);
            session.run_to_completion().unwrap();
            picks.push(session.outcome().cloned().unwrap());
        }
        picks
    };

    assert_eq!(draw(4242), draw(4242));
}

#[test]
fn test_reset_mid_wait_json() {
    let mut session = seeded(1);
    call(&mut session, r#"{"command":"add_bulk","text":"A,B"}"#);
    call(&mut session, r#"{"command":"start"}"#);
    session.advance(1_000).unwrap();
    assert_eq!(session.state().phase, CastingPhase::Waiting);

    let v = call(&mut session, r#"{"command":"reset"}"#);
    assert_eq!(v["snapshot"]["phase"], "Ready");
    assert_eq!(v["snapshot"]["participants"][0]["is_casting"], false);

    session.advance(60_000).unwrap();
    assert_eq!(session.state().phase, CastingPhase::Ready);
    assert!(session.outcome().is_none());
}

#[test]
fn test_global_session_wall_clock_cycle() {
    let config = SessionConfig::instant().with_seed(5);
    let v: Value = serde_json::from_str(&reset_session_json(&config.to_json().unwrap())).unwrap();
    assert_eq!(v["success"], true);

    session_command_json(r#"{"command":"add_bulk","text":"Andi,Budi,Citra"}"#);
    let v: Value = serde_json::from_str(&session_command_json(r#"{"command":"start"}"#)).unwrap();
    assert_eq!(v["outcome"], "Applied");

    let mut finished = false;
    for _ in 0..500 {
        thread::sleep(Duration::from_millis(2));
        let v: Value = serde_json::from_str(&session_pump_json()).unwrap();
        if v["snapshot"]["result_visible"] == true {
            assert_eq!(v["snapshot"]["phase"], "Ready");
            assert!(v["snapshot"]["outcome"]["winner_name"].is_string());
            finished = true;
            break;
        }
    }
    assert!(finished, "wall clock run did not finish");

    let bad: Value =
        serde_json::from_str(&reset_session_json(r#"{"min_participants": 1}"#)).unwrap();
    assert_eq!(bad["success"], false);
}
