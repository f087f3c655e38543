//! Game state: seats, talon and score bookkeeping.

use core::fmt;

use crate::bot::Bot;
use crate::card::{Card, Suit, full_deck};
use crate::moves::Move;
use crate::rng::GameRng;
use crate::rules::{self, HAND_SIZE, TrickWinner, WINNING_SCORE};

/// One of the two players. `One` is the seat passed first to `play_game`
/// and leads the first trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn other(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::One => write!(f, "seat one"),
            Seat::Two => write!(f, "seat two"),
        }
    }
}

/// Game phase: the talon is open in phase one, exhausted in phase two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    One,
    Two,
}

/// Score of one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    /// Points from won tricks and redeemed marriages
    pub direct_points: u32,
    /// Marriage points waiting for the seat's next won trick
    pub pending_points: u32,
}

impl Score {
    fn redeem_pending(&mut self) {
        self.direct_points += self.pending_points;
        self.pending_points = 0;
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending_points > 0 {
            write!(f, "{}(+{})", self.direct_points, self.pending_points)
        } else {
            write!(f, "{}", self.direct_points)
        }
    }
}

/// Face-down stock. The last card is the face-up trump card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Talon {
    cards: Vec<Card>,
    trump_suit: Suit,
}

impl Talon {
    pub fn new(cards: Vec<Card>, trump_suit: Suit) -> Self {
        Self { cards, trump_suit }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_suit
    }

    pub fn trump_card(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            None
        } else {
            Some(self.cards.remove(0))
        }
    }

    /// Put `jack` under the talon and hand back the previous trump card.
    fn exchange(&mut self, jack: Card) -> Option<Card> {
        let bottom = self.cards.last_mut()?;
        Some(core::mem::replace(bottom, jack))
    }
}

/// Everything the engine tracks about one seat.
pub struct BotState<'a> {
    pub seat: Seat,
    pub implementation: &'a mut dyn Bot,
    pub hand: Vec<Card>,
    pub score: Score,
    pub won_cards: Vec<Card>,
}

impl<'a> BotState<'a> {
    pub fn new(seat: Seat, implementation: &'a mut dyn Bot, hand: Vec<Card>) -> Self {
        Self {
            seat,
            implementation,
            hand,
            score: Score::default(),
            won_cards: Vec::new(),
        }
    }
}

impl fmt::Debug for BotState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotState")
            .field("seat", &self.seat)
            .field("hand", &self.hand)
            .field("score", &self.score)
            .field("won_cards", &self.won_cards)
            .finish()
    }
}

/// Outcome of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Seat,
    /// Game points (1 to 3)
    pub points: u32,
    pub winner_score: u32,
    pub loser_score: u32,
    /// Number of tricks played
    pub tricks: u32,
}

/// State of a game in progress.
#[derive(Debug)]
pub struct GameState<'a> {
    pub leader: BotState<'a>,
    pub follower: BotState<'a>,
    pub talon: Talon,
    /// 1-based number of the trick being played
    pub trick_number: u32,
}

impl<'a> GameState<'a> {
    /// Shuffle a fresh deck with `rng` and deal. `first` leads the first trick.
    pub fn deal(first: &'a mut dyn Bot, second: &'a mut dyn Bot, rng: &mut GameRng) -> Self {
        let mut deck = full_deck();
        rng.shuffle(&mut deck);

        let talon = deck.split_off(2 * HAND_SIZE);
        let second_hand = deck.split_off(HAND_SIZE);
        let first_hand = deck;
        // the talon is never empty right after dealing
        let trump_suit = talon.last().map_or(Suit::Hearts, |card| card.suit);

        Self {
            leader: BotState::new(Seat::One, first, first_hand),
            follower: BotState::new(Seat::Two, second, second_hand),
            talon: Talon::new(talon, trump_suit),
            trick_number: 1,
        }
    }

    pub fn trump_suit(&self) -> Suit {
        self.talon.trump_suit()
    }

    pub fn phase(&self) -> Phase {
        if self.talon.is_empty() { Phase::Two } else { Phase::One }
    }

    /// Apply a trump exchange by the leader. Returns false if not possible.
    pub(crate) fn exchange_trump(&mut self, jack: Card) -> bool {
        let Some(position) = self.leader.hand.iter().position(|c| *c == jack) else {
            return false;
        };
        match self.talon.exchange(jack) {
            Some(trump_card) => {
                self.leader.hand[position] = trump_card;
                true
            }
            None => false,
        }
    }

    /// Play out a trick from two validated cards, draw from the talon and
    /// return the result if the game ended.
    pub(crate) fn resolve_trick(
        &mut self,
        leader_move: Move,
        lead: Card,
        follow: Card,
    ) -> Option<GameResult> {
        let trump_suit = self.trump_suit();
        if let Move::Marriage { queen, .. } = leader_move {
            self.leader.score.pending_points += rules::marriage_points(queen.suit, trump_suit);
        }

        self.leader.hand.retain(|c| *c != lead);
        self.follower.hand.retain(|c| *c != follow);

        if rules::trick_winner(lead, follow, trump_suit) == TrickWinner::Follower {
            core::mem::swap(&mut self.leader, &mut self.follower);
        }

        let winner = &mut self.leader;
        winner.won_cards.push(lead);
        winner.won_cards.push(follow);
        winner.score.direct_points += lead.points() + follow.points();
        winner.score.redeem_pending();

        let tricks = self.trick_number;
        self.trick_number += 1;

        if self.leader.score.direct_points >= WINNING_SCORE {
            return Some(self.result_for_leader(tricks));
        }

        if let Some(card) = self.talon.draw() {
            self.leader.hand.push(card);
        }
        if let Some(card) = self.talon.draw() {
            self.follower.hand.push(card);
        }

        if self.leader.hand.is_empty() {
            return Some(self.result_for_leader(tricks));
        }
        None
    }

    fn result_for_leader(&self, tricks: u32) -> GameResult {
        let loser_score = self.follower.score.direct_points;
        GameResult {
            winner: self.leader.seat,
            points: rules::game_points(loser_score),
            winner_score: self.leader.score.direct_points,
            loser_score,
            tricks,
        }
    }
}
