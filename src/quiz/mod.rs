//! Quiz attempt state machine
//!
//! `Idle -> Active -> Completed`, with `reset()` returning to `Idle` and
//! `start()` replacing whatever attempt was there.

pub mod session;
pub mod state;

pub use session::{QuizSession, SessionError};
pub use state::{Progress, QuizPhase, QuizState};
