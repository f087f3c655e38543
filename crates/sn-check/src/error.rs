//! Verifier errors
//!
//! Divergences of the checked code are not errors; they end up in the
//! report. These variants abort a whole check.

use sn_core::EngineError;
use sn_trace::{GameId, TraceError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Replay of game {game_id} failed: {source}")]
    Engine {
        game_id: GameId,
        #[source]
        source: EngineError,
    },

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("No condition 1 outcomes recorded for game {game_id}")]
    MissingGate { game_id: GameId },
}
