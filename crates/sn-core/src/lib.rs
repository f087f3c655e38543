//! sn-core: deterministic Schnapsen engine
//!
//! Two seats, a 20-card deck and a talon. Given the same seed and the same
//! seat policies a game replays identically, decision point for decision
//! point. The engine has no I/O.

pub mod bot;
pub mod card;
pub mod engine;
pub mod moves;
pub mod perspective;
pub mod rules;
pub mod state;

mod error;
mod rng;

pub use bot::{Bot, FirstMoveBot, RandBot};
pub use card::{Card, ParseCardError, Rank, Suit};
pub use engine::{GamePlayEngine, MoveRequester, SimpleMoveRequester};
pub use error::EngineError;
pub use moves::Move;
pub use perspective::{PlayerPerspective, Role};
pub use rng::GameRng;
pub use state::{BotState, GameResult, GameState, Phase, Score, Seat};
