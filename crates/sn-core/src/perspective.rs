//! What a seat is allowed to see when it has to move.

use core::fmt;

use crate::card::{Card, Suit};
use crate::moves::Move;
use crate::rules;
use crate::state::{BotState, GameState, Phase, Score, Seat};

/// Role of the moving seat within the current trick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower,
}

/// Snapshot of the game from one seat's point of view.
///
/// Built fresh at every decision point; it owns its data so the engine can
/// hand the seat state out mutably while the perspective is alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPerspective {
    seat: Seat,
    role: Role,
    hand: Vec<Card>,
    score: Score,
    opponent_score: Score,
    trump_suit: Suit,
    trump_card: Option<Card>,
    talon_size: usize,
    won_cards: Vec<Card>,
    opponent_won_cards: Vec<Card>,
    trick_number: u32,
    leader_move: Option<Move>,
    valid_moves: Vec<Move>,
}

impl PlayerPerspective {
    /// Perspective of the leader at the start of a trick.
    pub fn for_leader(state: &GameState<'_>) -> Self {
        let talon_open = !state.talon.is_empty();
        let valid_moves = rules::leader_moves(&state.leader.hand, state.trump_suit(), talon_open);
        Self::build(state, &state.leader, &state.follower, Role::Leader, None, valid_moves)
    }

    /// Perspective of the follower answering `leader_move`.
    pub fn for_follower(state: &GameState<'_>, leader_move: Move) -> Self {
        let talon_open = !state.talon.is_empty();
        let valid_moves = match leader_move.played_card() {
            Some(lead) => {
                rules::follower_moves(&state.follower.hand, state.trump_suit(), talon_open, lead)
            }
            None => Vec::new(),
        };
        let (me, opponent) = (&state.follower, &state.leader);
        Self::build(state, me, opponent, Role::Follower, Some(leader_move), valid_moves)
    }

    fn build(
        state: &GameState<'_>,
        me: &BotState<'_>,
        opponent: &BotState<'_>,
        role: Role,
        leader_move: Option<Move>,
        valid_moves: Vec<Move>,
    ) -> Self {
        Self {
            seat: me.seat,
            role,
            hand: me.hand.clone(),
            score: me.score,
            opponent_score: opponent.score,
            trump_suit: state.trump_suit(),
            trump_card: state.talon.trump_card(),
            talon_size: state.talon.len(),
            won_cards: me.won_cards.clone(),
            opponent_won_cards: opponent.won_cards.clone(),
            trick_number: state.trick_number,
            leader_move,
            valid_moves,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn am_i_leader(&self) -> bool {
        self.role == Role::Leader
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn opponent_score(&self) -> Score {
        self.opponent_score
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    /// Face-up trump card, `None` once the talon is exhausted.
    pub fn trump_card(&self) -> Option<Card> {
        self.trump_card
    }

    pub fn talon_size(&self) -> usize {
        self.talon_size
    }

    pub fn phase(&self) -> Phase {
        if self.talon_size == 0 { Phase::Two } else { Phase::One }
    }

    pub fn won_cards(&self) -> &[Card] {
        &self.won_cards
    }

    pub fn opponent_won_cards(&self) -> &[Card] {
        &self.opponent_won_cards
    }

    pub fn trick_number(&self) -> u32 {
        self.trick_number
    }

    pub fn leader_move(&self) -> Option<Move> {
        self.leader_move
    }

    /// Legal moves in engine order.
    pub fn valid_moves(&self) -> &[Move] {
        &self.valid_moves
    }
}

impl fmt::Display for PlayerPerspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            Role::Leader => "leader",
            Role::Follower => "follower",
        };
        write!(f, "[{} as {role}, trick {}, hand", self.seat, self.trick_number)?;
        for card in &self.hand {
            write!(f, " {card}")?;
        }
        write!(f, ", trump {}", self.trump_suit)?;
        if let Some(card) = self.trump_card {
            write!(f, " ({card} under a talon of {})", self.talon_size)?;
        }
        write!(f, ", score {}-{}", self.score, self.opponent_score)?;
        if let Some(mv) = self.leader_move {
            write!(f, ", leader played {mv}")?;
        }
        write!(f, "]")
    }
}
