//! sn-check: replay-based conformance checking
//!
//! Replays recorded reference games through the deterministic engine with a
//! checking hook installed at every decision point, and collects where the
//! student's conditions, actions and complete bot diverge from the recording.

pub mod assess;
pub mod guard;
pub mod hook;
pub mod report;
pub mod verify;

mod error;

pub use assess::{Assessment, Assignment, assess_correctness};
pub use error::CheckError;
pub use guard::{invoke_guarded, panic_message};
pub use hook::{CheckingRequester, Cursor, Implementation, IntegrationCheckingRequester};
pub use report::{CategoryStatus, StatusReport};
pub use verify::{
    Divergences, OPPONENT_SEED_OFFSET, STUDENT_SEAT, assess_actions_correctness,
    assess_conditions_correctness, assess_integration_correctness, opponent_seed,
};
