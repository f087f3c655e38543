//! Replay checks against traces recorded from a known-good bot.

mod common;

use std::cell::Cell;

use common::{ReferenceBot, decision_points, record_log};
use proptest::prelude::*;
use sn_check::{
    Assignment, CheckError, Implementation, StatusReport, assess_actions_correctness,
    assess_conditions_correctness, assess_correctness, assess_integration_correctness,
};
use sn_core::{Bot, Move, PlayerPerspective};
use sn_trace::{ActionGameLog, ConditionGameLog, MoveRecord};

const GAMES: [u64; 3] = [11, 12, 13];

fn condition2(bot: &ReferenceBot) -> Implementation<'_, bool> {
    Implementation::new("condition2", move |p, m| bot.condition2(p, m))
}

#[test]
fn test_conformant_bot_has_no_divergences() {
    let log = record_log(&mut ReferenceBot, &GAMES);
    let assessment = assess_correctness(&mut ReferenceBot, 42, &log).unwrap();

    assert_eq!(assessment.conditions.len(), 3);
    assert_eq!(assessment.actions.len(), 4);
    assert_eq!(assessment.integration.len(), 1);
    assert!(assessment.is_conformant(), "{assessment:?}");
    assert!(StatusReport::new("ReferenceBot", 42, &assessment).passed());
}

#[test]
fn test_recording_is_deterministic() {
    assert_eq!(record_log(&mut ReferenceBot, &GAMES), record_log(&mut ReferenceBot, &GAMES));
}

#[test]
fn test_single_mismatch_is_reported_once() {
    let mut games = record_log(&mut ReferenceBot, &GAMES[..1]).condition2;
    let k = 4;
    games[0].outcomes[k] = !games[0].outcomes[k];
    let expected = games[0].outcomes[k];

    let bot = ReferenceBot;
    let errors = assess_conditions_correctness(&condition2(&bot), 1, &games).unwrap();

    let (perspective, _) = &decision_points(GAMES[0])[k];
    assert_eq!(
        errors,
        [format!(
            "Something is wrong with condition2. For input {perspective}, {expected} was expected, but got {}.",
            !expected
        )]
    );
}

#[test]
fn test_first_failing_game_short_circuits() {
    let mut games = record_log(&mut ReferenceBot, &GAMES).condition2;
    for game in &mut games[1..] {
        game.outcomes[0] = !game.outcomes[0];
    }
    let bot = ReferenceBot;

    let errors = assess_conditions_correctness(&condition2(&bot), 1, &games).unwrap();
    let alone = assess_conditions_correctness(&condition2(&bot), 1, &games[1..2]).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors, alone);
}

#[test]
fn test_gate_limits_invocations() {
    let log = record_log(&mut ReferenceBot, &GAMES);
    let bot = ReferenceBot;
    let calls = Cell::new(0usize);
    let action1 = Implementation::new("action1", |p: &PlayerPerspective, m| {
        calls.set(calls.get() + 1);
        bot.action1(p, m)
    });

    let errors =
        assess_actions_correctness(&action1, 1, &log.action1, Some(&log.condition1)).unwrap();
    assert!(errors.is_empty(), "{errors:?}");

    let gated: usize = log
        .condition1
        .iter()
        .map(|game| game.outcomes.iter().filter(|&&open| open).count())
        .sum();
    let points: usize = GAMES.iter().map(|&id| decision_points(id).len()).sum();
    assert_eq!(calls.get(), gated);
    assert!(gated < points);
}

#[test]
fn test_ungated_action_sees_every_decision_point() {
    let log = record_log(&mut ReferenceBot, &GAMES[..1]);
    let bot = ReferenceBot;
    let calls = Cell::new(0usize);
    let action2 = Implementation::new("action2", |p: &PlayerPerspective, m| {
        calls.set(calls.get() + 1);
        bot.action2(p, m)
    });

    assert!(assess_actions_correctness(&action2, 1, &log.action2, None).unwrap().is_empty());
    assert_eq!(calls.get(), decision_points(GAMES[0]).len());
}

#[test]
fn test_panic_consumes_no_recorded_outcome() {
    let log = record_log(&mut ReferenceBot, &GAMES[..1]);
    let recorded = log.condition3[0].outcomes.clone();
    let calls = Cell::new(0usize);
    // fails on the third call, then answers the outcomes still pending
    let flaky = Implementation::new("condition3", |_: &PlayerPerspective, _| {
        calls.set(calls.get() + 1);
        match calls.get() {
            3 => panic!("talon lookup failed"),
            n if n < 3 => recorded[n - 1],
            n => recorded[n - 2],
        }
    });

    let errors = assess_conditions_correctness(&flaky, 1, &log.condition3).unwrap();
    assert_eq!(
        errors,
        ["An exception was raised from condition3 with message: talon lookup failed"]
    );
    assert_eq!(calls.get(), decision_points(GAMES[0]).len());
}

#[test]
fn test_short_trace_is_reported() {
    let mut games = record_log(&mut ReferenceBot, &GAMES[..1]).condition3;
    games[0].outcomes.pop();
    let bot = ReferenceBot;
    let condition3 = Implementation::new("condition3", |p: &PlayerPerspective, m| bot.condition3(p, m));

    let errors = assess_conditions_correctness(&condition3, 1, &games).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("ended early"));
}

#[test]
fn test_missing_gate_is_fatal() {
    let log = record_log(&mut ReferenceBot, &GAMES[..1]);
    let bot = ReferenceBot;
    let action1 = Implementation::new("action1", |p: &PlayerPerspective, m| bot.action1(p, m));
    let other_game = [ConditionGameLog {
        game_id: 99,
        outcomes: vec![true],
    }];

    let result = assess_actions_correctness(&action1, 1, &log.action1, Some(&other_game));
    assert!(matches!(result, Err(CheckError::MissingGate { game_id: 11 })));
}

#[test]
fn test_corrupt_move_record_is_fatal() {
    let bot = ReferenceBot;
    let action4 = Implementation::new("action4", |p: &PlayerPerspective, m| bot.action4(p, m));
    let games = [ActionGameLog {
        game_id: 1,
        outcomes: vec![MoveRecord::Regular { card: "XX".into() }],
    }];
    assert!(matches!(
        assess_actions_correctness(&action4, 1, &games, None),
        Err(CheckError::Trace(_))
    ));
}

/// Reference play, except for one planted deviation or panic.
struct Saboteur {
    calls: usize,
    at: usize,
    panic: bool,
    done: bool,
}

impl Saboteur {
    fn new(at: usize, panic: bool) -> Self {
        Self {
            calls: 0,
            at,
            panic,
            done: false,
        }
    }
}

impl Bot for Saboteur {
    fn get_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        self.calls += 1;
        let good = ReferenceBot.get_move(perspective, leader_move);
        if self.done || self.calls < self.at {
            return good;
        }
        if self.panic {
            self.done = true;
            panic!("deliberate failure");
        }
        match perspective.valid_moves().iter().find(|&&mv| mv != good) {
            Some(&bad) => {
                self.done = true;
                bad
            }
            None => good,
        }
    }
}

#[test]
fn test_integration_wrong_move_does_not_cascade() {
    let log = record_log(&mut ReferenceBot, &GAMES[..1]);
    let mut bot = Saboteur::new(2, false);

    let errors = assess_integration_correctness(&mut bot, 1, &log.integration).unwrap();
    assert!(bot.done);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].starts_with("Bot played a wrong move. For input "));
}

#[test]
fn test_integration_panic_does_not_cascade() {
    let log = record_log(&mut ReferenceBot, &GAMES[..1]);
    let mut bot = Saboteur::new(3, true);

    let errors = assess_integration_correctness(&mut bot, 1, &log.integration).unwrap();
    assert_eq!(
        errors,
        ["An exception was raised your bot with message: deliberate failure"]
    );
}

#[test]
fn test_integration_conformant_bot() {
    let log = record_log(&mut ReferenceBot, &GAMES);
    let errors = assess_integration_correctness(&mut ReferenceBot, 1, &log.integration).unwrap();
    assert!(errors.is_empty(), "{errors:?}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reference_trace_always_conforms(game_id in any::<u64>()) {
        let log = record_log(&mut ReferenceBot, &[game_id]);
        let assessment = assess_correctness(&mut ReferenceBot, game_id, &log).unwrap();
        prop_assert!(assessment.is_conformant());
    }
}
