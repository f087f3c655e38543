//! sn-trace: recorded reference traces
//!
//! The trace model checked against, the conversion of recorded moves into
//! engine moves, and the download/cache logic that obtains a student's trace.

pub mod log;
pub mod source;

mod error;

pub use error::TraceError;
pub use log::{
    ActionGameLog, ConditionGameLog, GameId, GameLog, MoveRecord, TRACE_FORMAT_VERSION,
    to_schnapsen_move,
};
pub use source::{TraceSource, TraceSourceConfig, load_trace_file};
