//! Engine errors

use thiserror::Error;

use crate::moves::Move;
use crate::state::Seat;

/// Errors raised while playing a game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{seat} played the illegal move {attempted} in trick {trick}")]
    IllegalMove { seat: Seat, attempted: Move, trick: u32 },
}
