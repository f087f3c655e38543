//! sn-student: the assignment bot
//!
//! Three conditions and four actions, combined into one playing policy.
//! Each function only looks at the perspective it is given.

use std::fmt;

use sn_check::Assignment;
use sn_core::rules::{self, TrickWinner};
use sn_core::{Bot, Card, Move, PlayerPerspective};

#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentBot;

impl AssignmentBot {
    pub fn new() -> Self {
        Self
    }
}

impl fmt::Display for AssignmentBot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssignmentBot")
    }
}

/// Plain card plays, in hand order
fn regular_cards(perspective: &PlayerPerspective) -> Vec<Card> {
    perspective
        .valid_moves()
        .iter()
        .filter_map(|mv| match mv {
            Move::Regular(card) => Some(*card),
            _ => None,
        })
        .collect()
}

/// Cards that would take the trick led with `lead`
fn winning_cards(perspective: &PlayerPerspective, lead: Card) -> Vec<Card> {
    regular_cards(perspective)
        .into_iter()
        .filter(|&card| {
            rules::trick_winner(lead, card, perspective.trump_suit()) == TrickWinner::Follower
        })
        .collect()
}

fn lead_card(leader_move: Option<Move>) -> Option<Card> {
    leader_move.and_then(|mv| mv.played_card())
}

impl Assignment for AssignmentBot {
    /// A marriage can be declared.
    fn condition1(&self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> bool {
        perspective.valid_moves().iter().any(Move::is_marriage)
    }

    /// Following, and some card takes the trick.
    fn condition2(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> bool {
        match lead_card(leader_move) {
            Some(lead) if !perspective.am_i_leader() => {
                !winning_cards(perspective, lead).is_empty()
            }
            _ => false,
        }
    }

    /// The talon is exhausted.
    fn condition3(&self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> bool {
        perspective.talon_size() == 0
    }

    /// Declare a marriage, the trump one first.
    fn action1(&self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> Move {
        let moves = perspective.valid_moves();
        let trump = perspective.trump_suit();
        moves
            .iter()
            .copied()
            .filter(Move::is_marriage)
            .max_by_key(|mv| mv.played_card().is_some_and(|queen| queen.suit == trump))
            .unwrap_or(moves[0])
    }

    /// Cheapest card that takes the trick.
    fn action2(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        let cheapest = lead_card(leader_move).and_then(|lead| {
            winning_cards(perspective, lead)
                .into_iter()
                .min_by_key(|card| card.points())
        });
        match cheapest {
            Some(card) => Move::Regular(card),
            None => self.action4(perspective, leader_move),
        }
    }

    /// Most valuable card outside the trump suit.
    fn action3(&self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        let trump = perspective.trump_suit();
        regular_cards(perspective)
            .into_iter()
            .filter(|card| card.suit != trump)
            .max_by_key(|card| card.points())
            .map_or_else(|| self.action4(perspective, leader_move), Move::Regular)
    }

    /// Least valuable card.
    fn action4(&self, perspective: &PlayerPerspective, _leader_move: Option<Move>) -> Move {
        regular_cards(perspective)
            .into_iter()
            .min_by_key(|card| card.points())
            .map_or(perspective.valid_moves()[0], Move::Regular)
    }
}

impl Bot for AssignmentBot {
    fn get_move(&mut self, perspective: &PlayerPerspective, leader_move: Option<Move>) -> Move {
        if self.condition1(perspective, leader_move) {
            self.action1(perspective, leader_move)
        } else if self.condition2(perspective, leader_move) {
            self.action2(perspective, leader_move)
        } else if self.condition3(perspective, leader_move) && perspective.am_i_leader() {
            self.action3(perspective, leader_move)
        } else {
            self.action4(perspective, leader_move)
        }
    }
}
