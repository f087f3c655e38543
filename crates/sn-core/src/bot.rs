//! Seat policies.

use std::cell::RefCell;
use std::rc::Rc;

use crate::moves::Move;
use crate::perspective::PlayerPerspective;
use crate::rng::GameRng;

/// A seat policy: picks a move at each decision point.
pub trait Bot {
    fn get_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move;
}

/// A shared bot can sit in both seats and keeps a single random stream.
impl<B: Bot + ?Sized> Bot for Rc<RefCell<B>> {
    fn get_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        self.borrow_mut().get_move(perspective, leader_move)
    }
}

/// Reference opponent: uniformly random among the valid moves.
#[derive(Debug, Clone)]
pub struct RandBot {
    rng: GameRng,
}

impl RandBot {
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(GameRng::new(seed))
    }
}

impl Bot for RandBot {
    fn get_move(&mut self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> Move {
        let moves = perspective.valid_moves();
        // a seat asked to move always holds at least one card
        moves[self.rng.below(moves.len())]
    }
}

/// Always plays the first valid move. Handy as a fixed policy in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMoveBot;

impl Bot for FirstMoveBot {
    fn get_move(&mut self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> Move {
        perspective.valid_moves()[0]
    }
}
