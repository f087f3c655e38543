//! Cards of the 20-card Schnapsen deck.

use core::fmt;
use core::str::FromStr;

use strum::{EnumIter, IntoEnumIterator};
use thiserror::Error;

/// Card suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// Single-letter code used in card codes ("QH").
    pub fn code(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Suit::iter().find(|suit| suit.code() == code.to_ascii_uppercase())
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Card rank, ordered by trick-taking strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
pub enum Rank {
    Jack,
    Queen,
    King,
    Ten,
    Ace,
}

impl Rank {
    /// Card points scored by the trick winner
    pub fn points(self) -> u32 {
        match self {
            Rank::Jack => 2,
            Rank::Queen => 3,
            Rank::King => 4,
            Rank::Ten => 10,
            Rank::Ace => 11,
        }
    }

    pub fn code(self) -> char {
        match self {
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ten => 'T',
            Rank::Ace => 'A',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Rank::iter().find(|rank| rank.code() == code.to_ascii_uppercase())
    }
}

/// A single playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn points(self) -> u32 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

/// Error returned when a card code cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid card code {0:?}, expected rank (J/Q/K/T/A) followed by suit (H/D/C/S)")]
pub struct ParseCardError(pub String);

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCardError(s.to_string()));
        };
        match (Rank::from_code(rank), Suit::from_code(suit)) {
            (Some(rank), Some(suit)) => Ok(Card::new(rank, suit)),
            _ => Err(ParseCardError(s.to_string())),
        }
    }
}

/// All 20 cards in canonical order (suit by suit, weakest rank first).
pub fn full_deck() -> Vec<Card> {
    Suit::iter()
        .flat_map(|suit| Rank::iter().map(move |rank| Card::new(rank, suit)))
        .collect()
}
