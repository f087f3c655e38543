//! Game play engine
//!
//! Drives a game trick by trick. Every move goes through the engine's
//! [`MoveRequester`], which is the seam where checking hooks are installed.

use crate::bot::Bot;
use crate::error::EngineError;
use crate::moves::Move;
use crate::perspective::PlayerPerspective;
use crate::rng::GameRng;
use crate::state::{BotState, GameResult, GameState};

/// Obtains a move for the seat at a decision point.
///
/// Called exactly once per seat-turn, in game order.
pub trait MoveRequester {
    fn get_move(
        &mut self,
        bot: &mut BotState<'_>,
        perspective: &PlayerPerspective,
        leader_move: Option<Move>,
    ) -> Move;
}

/// Pass-through requester: asks the seat's own bot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMoveRequester;

impl MoveRequester for SimpleMoveRequester {
    fn get_move(
        &mut self,
        bot: &mut BotState<'_>,
        perspective: &PlayerPerspective,
        leader_move: Option<Move>,
    ) -> Move {
        bot.implementation.get_move(perspective, leader_move)
    }
}

/// Deterministic Schnapsen engine.
#[derive(Debug, Default)]
pub struct GamePlayEngine<R = SimpleMoveRequester> {
    move_requester: R,
}

impl<R: MoveRequester> GamePlayEngine<R> {
    pub fn new(move_requester: R) -> Self {
        Self { move_requester }
    }

    pub fn move_requester(&self) -> &R {
        &self.move_requester
    }

    pub fn into_move_requester(self) -> R {
        self.move_requester
    }

    /// Play a full game. `bot1` sits in seat one and leads the first trick;
    /// the deal is taken from `rng`.
    pub fn play_game<'b>(
        &mut self,
        bot1: &'b mut dyn Bot,
        bot2: &'b mut dyn Bot,
        rng: &mut GameRng,
    ) -> Result<GameResult, EngineError> {
        let mut state = GameState::deal(bot1, bot2, rng);
        loop {
            if let Some(result) = self.play_trick(&mut state)? {
                return Ok(result);
            }
        }
    }

    fn play_trick(&mut self, state: &mut GameState<'_>) -> Result<Option<GameResult>, EngineError> {
        let (leader_move, lead) = loop {
            let perspective = PlayerPerspective::for_leader(state);
            let mv = self.move_requester.get_move(&mut state.leader, &perspective, None);
            check_valid(state, &perspective, mv, true)?;
            match mv {
                Move::TrumpExchange { jack } => {
                    if !state.exchange_trump(jack) {
                        return Err(illegal(state, mv, true));
                    }
                }
                Move::Regular(card) => break (mv, card),
                Move::Marriage { queen, .. } => break (mv, queen),
            }
        };

        let perspective = PlayerPerspective::for_follower(state, leader_move);
        let mv = self
            .move_requester
            .get_move(&mut state.follower, &perspective, Some(leader_move));
        check_valid(state, &perspective, mv, false)?;
        let Move::Regular(follow) = mv else {
            return Err(illegal(state, mv, false));
        };

        Ok(state.resolve_trick(leader_move, lead, follow))
    }
}

fn check_valid(
    state: &GameState<'_>,
    perspective: &PlayerPerspective,
    mv: Move,
    leading: bool,
) -> Result<(), EngineError> {
    if perspective.valid_moves().contains(&mv) {
        Ok(())
    } else {
        Err(illegal(state, mv, leading))
    }
}

fn illegal(state: &GameState<'_>, attempted: Move, leading: bool) -> EngineError {
    let seat = if leading { state.leader.seat } else { state.follower.seat };
    EngineError::IllegalMove {
        seat,
        attempted,
        trick: state.trick_number,
    }
}
