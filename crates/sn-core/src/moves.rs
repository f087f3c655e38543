//! Moves a seat can make at a decision point.

use core::fmt;

use crate::card::{Card, Rank, Suit};

/// A move requested from a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Play a single card to the trick.
    Regular(Card),
    /// Announce queen and king of one suit; the queen is played.
    Marriage { queen: Card, king: Card },
    /// Swap the trump jack for the face-up trump card. The leader moves again.
    TrumpExchange { jack: Card },
}

impl Move {
    pub fn marriage(suit: Suit) -> Self {
        Move::Marriage {
            queen: Card::new(Rank::Queen, suit),
            king: Card::new(Rank::King, suit),
        }
    }

    pub fn trump_exchange(trump_suit: Suit) -> Self {
        Move::TrumpExchange {
            jack: Card::new(Rank::Jack, trump_suit),
        }
    }

    /// Card put on the trick by this move, `None` for a trump exchange.
    pub fn played_card(&self) -> Option<Card> {
        match *self {
            Move::Regular(card) => Some(card),
            Move::Marriage { queen, .. } => Some(queen),
            Move::TrumpExchange { .. } => None,
        }
    }

    /// Every card the move shows to the opponent.
    pub fn cards(&self) -> Vec<Card> {
        match *self {
            Move::Regular(card) => vec![card],
            Move::Marriage { queen, king } => vec![queen, king],
            Move::TrumpExchange { jack } => vec![jack],
        }
    }

    pub fn is_marriage(&self) -> bool {
        matches!(self, Move::Marriage { .. })
    }

    pub fn is_trump_exchange(&self) -> bool {
        matches!(self, Move::TrumpExchange { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Regular(card) => write!(f, "{card}"),
            Move::Marriage { queen, king } => write!(f, "marriage({queen}+{king})"),
            Move::TrumpExchange { jack } => write!(f, "trump exchange({jack})"),
        }
    }
}
