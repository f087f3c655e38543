//! Recorded reference runs.
//!
//! A [`GameLog`] holds, per checked category, one record per replayed game.
//! Each record lists the outcomes the reference implementation produced, in
//! the order the decision points occurred.

use serde::{Deserialize, Serialize};
use sn_core::{Card, Move, Rank};

use crate::error::TraceError;

/// Identifies one recorded game. Also the seed of its deal.
pub type GameId = u64;

/// Current trace format version
pub const TRACE_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    TRACE_FORMAT_VERSION
}

/// Complete reference trace for one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub condition1: Vec<ConditionGameLog>,
    #[serde(default)]
    pub condition2: Vec<ConditionGameLog>,
    #[serde(default)]
    pub condition3: Vec<ConditionGameLog>,
    #[serde(default)]
    pub action1: Vec<ActionGameLog>,
    #[serde(default)]
    pub action2: Vec<ActionGameLog>,
    #[serde(default)]
    pub action3: Vec<ActionGameLog>,
    #[serde(default)]
    pub action4: Vec<ActionGameLog>,
    #[serde(default)]
    pub integration: Vec<ActionGameLog>,
}

impl Default for GameLog {
    fn default() -> Self {
        Self {
            version: TRACE_FORMAT_VERSION,
            condition1: Vec::new(),
            condition2: Vec::new(),
            condition3: Vec::new(),
            action1: Vec::new(),
            action2: Vec::new(),
            action3: Vec::new(),
            action4: Vec::new(),
            integration: Vec::new(),
        }
    }
}

impl GameLog {
    /// Parse a trace from its JSON encoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TraceError> {
        let log: GameLog = serde_json::from_slice(bytes)?;
        log.validate()?;
        Ok(log)
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, TraceError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        if self.version != TRACE_FORMAT_VERSION {
            return Err(TraceError::IncompatibleVersion {
                expected: TRACE_FORMAT_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }

    /// Condition groups in order 1, 2, 3.
    pub fn conditions(&self) -> [&[ConditionGameLog]; 3] {
        [&self.condition1, &self.condition2, &self.condition3]
    }

    /// Action groups in order 1 to 4.
    pub fn actions(&self) -> [&[ActionGameLog]; 4] {
        [&self.action1, &self.action2, &self.action3, &self.action4]
    }
}

/// Boolean outcomes of a condition during one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionGameLog {
    pub game_id: GameId,
    pub outcomes: Vec<bool>,
}

/// Moves chosen by an action (or the whole bot) during one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionGameLog {
    pub game_id: GameId,
    pub outcomes: Vec<MoveRecord>,
}

impl ActionGameLog {
    /// Convert every recorded outcome to an engine move.
    pub fn moves(&self) -> Result<Vec<Move>, TraceError> {
        self.outcomes.iter().map(to_schnapsen_move).collect()
    }
}

/// Serialized form of a move, cards given as codes such as `"QH"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveRecord {
    Regular { card: String },
    Marriage { queen: String, king: String },
    TrumpExchange { jack: String },
}

impl From<Move> for MoveRecord {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Regular(card) => MoveRecord::Regular {
                card: card.to_string(),
            },
            Move::Marriage { queen, king } => MoveRecord::Marriage {
                queen: queen.to_string(),
                king: king.to_string(),
            },
            Move::TrumpExchange { jack } => MoveRecord::TrumpExchange {
                jack: jack.to_string(),
            },
        }
    }
}

/// Convert a recorded move into the engine's representation.
pub fn to_schnapsen_move(record: &MoveRecord) -> Result<Move, TraceError> {
    match record {
        MoveRecord::Regular { card } => Ok(Move::Regular(card.parse()?)),
        MoveRecord::Marriage { queen, king } => {
            let queen: Card = queen.parse()?;
            let king: Card = king.parse()?;
            if queen.rank != Rank::Queen || king.rank != Rank::King || queen.suit != king.suit {
                return Err(TraceError::InvalidMove(format!(
                    "marriage of {queen} and {king}"
                )));
            }
            Ok(Move::Marriage { queen, king })
        }
        MoveRecord::TrumpExchange { jack } => {
            let jack: Card = jack.parse()?;
            if jack.rank != Rank::Jack {
                return Err(TraceError::InvalidMove(format!("trump exchange with {jack}")));
            }
            Ok(Move::TrumpExchange { jack })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sn_core::Suit;

    #[test]
    fn test_parse_minimal_log() {
        let json = br#"{
            "condition1": [{"game_id": 3, "outcomes": [true, false]}],
            "action2": [{"game_id": 3, "outcomes": [
                {"type": "regular", "card": "AS"},
                {"type": "marriage", "queen": "QH", "king": "KH"},
                {"type": "trump_exchange", "jack": "JD"}
            ]}]
        }"#;
        let log = GameLog::from_slice(json).unwrap();
        assert_eq!(log.version, TRACE_FORMAT_VERSION);
        assert_eq!(log.conditions()[0][0].outcomes, vec![true, false]);
        assert!(log.integration.is_empty());

        let moves = log.actions()[1][0].moves().unwrap();
        assert_eq!(moves[0], Move::Regular("AS".parse().unwrap()));
        assert_eq!(moves[1], Move::marriage(Suit::Hearts));
        assert_eq!(moves[2], Move::trump_exchange(Suit::Diamonds));
    }

    #[test]
    fn test_default_is_current_version() {
        assert!(GameLog::default().validate().is_ok());
    }

    #[test]
    fn test_incompatible_version() {
        let result = GameLog::from_slice(br#"{"version": 7}"#);
        assert!(matches!(
            result,
            Err(TraceError::IncompatibleVersion { expected: 1, found: 7 })
        ));
    }

    #[test]
    fn test_garbage_is_a_serialization_error() {
        assert!(matches!(
            GameLog::from_slice(b"not json"),
            Err(TraceError::Serialization(_))
        ));
    }

    #[test]
    fn test_move_record_from_move() {
        let record = MoveRecord::from(Move::marriage(Suit::Spades));
        assert_eq!(
            record,
            MoveRecord::Marriage {
                queen: "QS".into(),
                king: "KS".into()
            }
        );
        assert_eq!(to_schnapsen_move(&record).unwrap(), Move::marriage(Suit::Spades));
    }

    #[test]
    fn test_rejects_bad_records() {
        let bad_card = MoveRecord::Regular { card: "ZZ".into() };
        assert!(matches!(to_schnapsen_move(&bad_card), Err(TraceError::Card(_))));

        let mixed = MoveRecord::Marriage {
            queen: "QS".into(),
            king: "KH".into(),
        };
        assert!(matches!(to_schnapsen_move(&mixed), Err(TraceError::InvalidMove(_))));

        let not_jack = MoveRecord::TrumpExchange { jack: "AS".into() };
        assert!(matches!(to_schnapsen_move(&not_jack), Err(TraceError::InvalidMove(_))));
    }
}
