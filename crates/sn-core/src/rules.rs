//! Move legality, trick resolution and scoring.

use crate::card::{Card, Rank, Suit};
use crate::moves::Move;

/// Points needed to end the game immediately
pub const WINNING_SCORE: u32 = 66;

/// Points of a marriage in a plain suit
pub const MARRIAGE_POINTS: u32 = 20;

/// Points of a marriage in the trump suit
pub const TRUMP_MARRIAGE_POINTS: u32 = 40;

/// Number of cards dealt to each seat
pub const HAND_SIZE: usize = 5;

/// Which side of a trick won it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrickWinner {
    Leader,
    Follower,
}

/// Moves open to the leader.
///
/// Order is hand order, then marriages by suit, then the trump exchange.
/// Bots choosing by index rely on this order being stable.
pub fn leader_moves(hand: &[Card], trump_suit: Suit, talon_open: bool) -> Vec<Move> {
    let mut moves: Vec<Move> = hand.iter().copied().map(Move::Regular).collect();

    let mut suits: Vec<Suit> = hand
        .iter()
        .filter(|card| card.rank == Rank::Queen)
        .map(|card| card.suit)
        .filter(|suit| hand.contains(&Card::new(Rank::King, *suit)))
        .collect();
    suits.sort();
    moves.extend(suits.into_iter().map(Move::marriage));

    if talon_open && hand.contains(&Card::new(Rank::Jack, trump_suit)) {
        moves.push(Move::trump_exchange(trump_suit));
    }
    moves
}

/// Moves open to the follower after the leader played `lead`.
///
/// While the talon is open anything goes. Once it is exhausted the follower
/// must follow suit (beating the lead if possible) or else trump.
pub fn follower_moves(hand: &[Card], trump_suit: Suit, talon_open: bool, lead: Card) -> Vec<Move> {
    if talon_open {
        return hand.iter().copied().map(Move::Regular).collect();
    }

    let same_suit: Vec<Card> = hand.iter().copied().filter(|c| c.suit == lead.suit).collect();
    let allowed = if !same_suit.is_empty() {
        let higher: Vec<Card> = same_suit.iter().copied().filter(|c| c.rank > lead.rank).collect();
        if higher.is_empty() { same_suit } else { higher }
    } else {
        let trumps: Vec<Card> = hand.iter().copied().filter(|c| c.suit == trump_suit).collect();
        if trumps.is_empty() { hand.to_vec() } else { trumps }
    };
    allowed.into_iter().map(Move::Regular).collect()
}

/// Decide who takes the trick.
pub fn trick_winner(lead: Card, follow: Card, trump_suit: Suit) -> TrickWinner {
    if follow.suit == lead.suit {
        if follow.rank > lead.rank {
            TrickWinner::Follower
        } else {
            TrickWinner::Leader
        }
    } else if follow.suit == trump_suit {
        TrickWinner::Follower
    } else {
        TrickWinner::Leader
    }
}

pub fn marriage_points(suit: Suit, trump_suit: Suit) -> u32 {
    if suit == trump_suit {
        TRUMP_MARRIAGE_POINTS
    } else {
        MARRIAGE_POINTS
    }
}

/// Game points awarded to the winner, depending on the loser's score.
pub fn game_points(loser_points: u32) -> u32 {
    if loser_points == 0 {
        3
    } else if loser_points < WINNING_SCORE / 2 {
        2
    } else {
        1
    }
}
