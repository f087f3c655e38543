//! Trace errors

use sn_core::ParseCardError;
use thiserror::Error;

/// Errors raised while obtaining or decoding a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server could not be contacted: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("No cached trace for student {student_id} and the network is disabled")]
    Offline { student_id: u64 },

    #[error("Incompatible trace version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error(transparent)]
    Card(#[from] ParseCardError),

    #[error("Invalid recorded move: {0}")]
    InvalidMove(String),
}
