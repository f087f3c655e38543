//! Shared fixtures: a reference solution and a recorder producing traces
//! the same way the assignment server does.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sn_check::{Assignment, STUDENT_SEAT, opponent_seed};
use sn_core::{
    Bot, BotState, GamePlayEngine, GameRng, Move, MoveRequester, PlayerPerspective, RandBot,
};
use sn_trace::{ActionGameLog, ConditionGameLog, GameId, GameLog, MoveRecord};

/// Plain solution of the assignment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBot;

fn regular_moves(perspective: &PlayerPerspective) -> impl Iterator<Item = Move> + '_ {
    perspective
        .valid_moves()
        .iter()
        .copied()
        .filter(|mv| !mv.is_marriage() && !mv.is_trump_exchange())
}

fn points(mv: &Move) -> u32 {
    mv.played_card().map_or(0, |card| card.points())
}

impl Assignment for ReferenceBot {
    /// A marriage can be declared
    fn condition1(&self, perspective: &PlayerPerspective, _: Option<Move>) -> bool {
        perspective.valid_moves().iter().any(Move::is_marriage)
    }

    fn condition2(&self, perspective: &PlayerPerspective, _: Option<Move>) -> bool {
        perspective.am_i_leader()
    }

    fn condition3(&self, perspective: &PlayerPerspective, _: Option<Move>) -> bool {
        perspective.talon_size() == 0
    }

    fn action1(&self, perspective: &PlayerPerspective, _: Option<Move>) -> Move {
        let moves = perspective.valid_moves();
        moves.iter().copied().find(Move::is_marriage).unwrap_or(moves[0])
    }

    fn action2(&self, perspective: &PlayerPerspective, _: Option<Move>) -> Move {
        regular_moves(perspective)
            .min_by_key(points)
            .unwrap_or(perspective.valid_moves()[0])
    }

    fn action3(&self, perspective: &PlayerPerspective, _: Option<Move>) -> Move {
        regular_moves(perspective)
            .max_by_key(points)
            .unwrap_or(perspective.valid_moves()[0])
    }

    fn action4(&self, perspective: &PlayerPerspective, _: Option<Move>) -> Move {
        let moves = perspective.valid_moves();
        moves[moves.len() - 1]
    }
}

impl Bot for ReferenceBot {
    fn get_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        if self.condition1(perspective, leader_move) {
            self.action1(perspective, leader_move)
        } else if self.condition3(perspective, leader_move) {
            self.action3(perspective, leader_move)
        } else if !self.condition2(perspective, leader_move) {
            self.action2(perspective, leader_move)
        } else {
            self.action4(perspective, leader_move)
        }
    }
}

/// Remembers every decision point and the move that was played.
#[derive(Default)]
pub struct Tape {
    pub seen: Vec<(PlayerPerspective, Option<Move>, Move)>,
}

impl MoveRequester for Tape {
    fn get_move(
        &mut self,
        bot: &mut BotState<'_>,
        perspective: &PlayerPerspective,
        leader_move: Option<Move>,
    ) -> Move {
        let mv = bot.implementation.get_move(perspective, leader_move);
        self.seen.push((perspective.clone(), leader_move, mv));
        mv
    }
}

/// Decision points of a game with the random policy in both seats.
pub fn decision_points(game_id: GameId) -> Vec<(PlayerPerspective, Option<Move>)> {
    let policy = Rc::new(RefCell::new(RandBot::seeded(opponent_seed(game_id))));
    let mut seat_one = Rc::clone(&policy);
    let mut seat_two = policy;
    let mut engine = GamePlayEngine::new(Tape::default());
    engine
        .play_game(&mut seat_one, &mut seat_two, &mut GameRng::new(game_id))
        .unwrap();
    engine
        .into_move_requester()
        .seen
        .into_iter()
        .map(|(perspective, leader_move, _)| (perspective, leader_move))
        .collect()
}

/// Every move of a game with `bot` in the student seat.
pub fn integration_moves(bot: &mut dyn Bot, game_id: GameId) -> Vec<Move> {
    assert_eq!(STUDENT_SEAT, sn_core::Seat::One);
    let mut opponent = RandBot::seeded(opponent_seed(game_id));
    let mut engine = GamePlayEngine::new(Tape::default());
    engine
        .play_game(bot, &mut opponent, &mut GameRng::new(game_id))
        .unwrap();
    engine.into_move_requester().seen.into_iter().map(|(_, _, mv)| mv).collect()
}

fn condition_log(
    game_ids: &[GameId],
    condition: impl Fn(&PlayerPerspective, Option<Move>) -> bool,
) -> Vec<ConditionGameLog> {
    game_ids
        .iter()
        .map(|&game_id| ConditionGameLog {
            game_id,
            outcomes: decision_points(game_id)
                .iter()
                .map(|(p, m)| condition(p, *m))
                .collect(),
        })
        .collect()
}

fn action_log(
    game_ids: &[GameId],
    gate: impl Fn(&PlayerPerspective, Option<Move>) -> bool,
    action: impl Fn(&PlayerPerspective, Option<Move>) -> Move,
) -> Vec<ActionGameLog> {
    game_ids
        .iter()
        .map(|&game_id| ActionGameLog {
            game_id,
            outcomes: decision_points(game_id)
                .iter()
                .filter(|(p, m)| gate(p, *m))
                .map(|(p, m)| MoveRecord::from(action(p, *m)))
                .collect(),
        })
        .collect()
}

/// Trace of `bot` over the given games, laid out like a downloaded one.
pub fn record_log<A: Assignment>(bot: &mut A, game_ids: &[GameId]) -> GameLog {
    let student: &A = bot;
    let always = |_: &PlayerPerspective, _: Option<Move>| true;
    let mut log = GameLog {
        condition1: condition_log(game_ids, |p, m| student.condition1(p, m)),
        condition2: condition_log(game_ids, |p, m| student.condition2(p, m)),
        condition3: condition_log(game_ids, |p, m| student.condition3(p, m)),
        action1: action_log(game_ids, |p, m| student.condition1(p, m), |p, m| student.action1(p, m)),
        action2: action_log(game_ids, always, |p, m| student.action2(p, m)),
        action3: action_log(game_ids, always, |p, m| student.action3(p, m)),
        action4: action_log(game_ids, always, |p, m| student.action4(p, m)),
        ..GameLog::default()
    };
    log.integration = game_ids
        .iter()
        .map(|&game_id| ActionGameLog {
            game_id,
            outcomes: integration_moves(&mut *bot, game_id)
                .into_iter()
                .map(MoveRecord::from)
                .collect(),
        })
        .collect();
    log
}
