//! Per-category verifiers.
//!
//! Each verifier replays the recorded games of one category in trace order
//! and stops at the first game that produced divergences. The deal of a game
//! is seeded with its id, the random seat policy with the id plus
//! [`OPPONENT_SEED_OFFSET`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use sn_core::{Bot, GamePlayEngine, GameRng, Move, RandBot, Seat};
use sn_trace::{ActionGameLog, ConditionGameLog, GameId};
use tracing::{debug, info, info_span, warn};

use crate::error::CheckError;
use crate::hook::{CheckingRequester, Implementation, IntegrationCheckingRequester};

/// Added to the game id to seed the random seat policy
pub const OPPONENT_SEED_OFFSET: u64 = 12_345_678_910;

/// Seat of the student bot in integration games
pub const STUDENT_SEAT: Seat = Seat::One;

/// Ordered divergence messages of one category, empty when conformant
pub type Divergences = Vec<String>;

pub fn opponent_seed(game_id: GameId) -> u64 {
    game_id.wrapping_add(OPPONENT_SEED_OFFSET)
}

/// Check a condition against its recorded outcomes.
pub fn assess_conditions_correctness(
    implementation: &Implementation<'_, bool>,
    student_id: u64,
    games: &[ConditionGameLog],
) -> Result<Divergences, CheckError> {
    let span = info_span!("check", category = implementation.name(), student_id);
    let _guard = span.enter();

    for game in games {
        let errors = replay_checked(implementation, game.game_id, game.outcomes.clone(), None)?;
        if !errors.is_empty() {
            info!(game_id = game.game_id, divergences = errors.len(), "divergence found");
            return Ok(errors);
        }
    }
    debug!(games = games.len(), "all games conform");
    Ok(Divergences::new())
}

/// Check an action against its recorded moves.
///
/// With `gates`, the action is only compared where the gating condition was
/// recorded as true; the gate of a game is found by its id.
pub fn assess_actions_correctness(
    implementation: &Implementation<'_, Move>,
    student_id: u64,
    games: &[ActionGameLog],
    gates: Option<&[ConditionGameLog]>,
) -> Result<Divergences, CheckError> {
    let span = info_span!("check", category = implementation.name(), student_id);
    let _guard = span.enter();

    let gates: Option<HashMap<GameId, &[bool]>> = gates.map(|records| {
        records
            .iter()
            .map(|record| (record.game_id, record.outcomes.as_slice()))
            .collect()
    });

    for game in games {
        let gate = match &gates {
            None => None,
            Some(gates) => match gates.get(&game.game_id) {
                Some(outcomes) => Some(outcomes.to_vec()),
                None => return Err(CheckError::MissingGate { game_id: game.game_id }),
            },
        };
        let errors = replay_checked(implementation, game.game_id, game.moves()?, gate)?;
        if !errors.is_empty() {
            info!(game_id = game.game_id, divergences = errors.len(), "divergence found");
            return Ok(errors);
        }
    }
    debug!(games = games.len(), "all games conform");
    Ok(Divergences::new())
}

/// Check the complete bot in seat one against a random opponent.
pub fn assess_integration_correctness<B: Bot>(
    bot: &mut B,
    student_id: u64,
    games: &[ActionGameLog],
) -> Result<Divergences, CheckError> {
    let span = info_span!("check", category = "integration", student_id);
    let _guard = span.enter();

    for game in games {
        let game_id = game.game_id;
        let mut opponent = RandBot::seeded(opponent_seed(game_id));
        let hook = IntegrationCheckingRequester::new(STUDENT_SEAT, game.moves()?);
        let mut engine = GamePlayEngine::new(hook);
        let result = engine
            .play_game(&mut *bot, &mut opponent, &mut GameRng::new(game_id))
            .map_err(|source| CheckError::Engine { game_id, source })?;

        let hook = engine.into_move_requester();
        debug!(game_id, winner = %result.winner, checked = hook.checked(), "game replayed");
        if hook.unconsumed_outcomes() > 0 {
            warn!(game_id, left = hook.unconsumed_outcomes(), "recorded moves left unused");
        }
        let errors = hook.into_errors();
        if !errors.is_empty() {
            info!(game_id, divergences = errors.len(), "divergence found");
            return Ok(errors);
        }
    }
    debug!(games = games.len(), "all games conform");
    Ok(Divergences::new())
}

/// Replay one game with the random policy in both seats.
fn replay_checked<T>(
    implementation: &Implementation<'_, T>,
    game_id: GameId,
    expected: Vec<T>,
    gate: Option<Vec<bool>>,
) -> Result<Divergences, CheckError>
where
    T: Clone + PartialEq + fmt::Display,
{
    // one random stream shared by both seats
    let policy = Rc::new(RefCell::new(RandBot::seeded(opponent_seed(game_id))));
    let mut seat_one = Rc::clone(&policy);
    let mut seat_two = policy;

    let mut engine = GamePlayEngine::new(CheckingRequester::new(implementation, expected, gate));
    let result = engine
        .play_game(&mut seat_one, &mut seat_two, &mut GameRng::new(game_id))
        .map_err(|source| CheckError::Engine { game_id, source })?;

    let hook = engine.into_move_requester();
    debug!(
        game_id,
        winner = %result.winner,
        decision_points = hook.decision_points(),
        invocations = hook.invocations(),
        "game replayed"
    );
    if hook.unconsumed_outcomes() > 0 {
        warn!(game_id, left = hook.unconsumed_outcomes(), "recorded outcomes left unused");
    }
    Ok(hook.into_errors())
}
