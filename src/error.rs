// Boundary errors. Inside the core, activities are valid by construction;
// these surface only where untrusted values or misuse enter.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// An activity value outside the known set reached trusted logic. This
    /// is a protocol contract violation, not a recoverable condition.
    #[error("unknown player activity value: {0}")]
    InvalidActivity(u8),

    /// `start` was called while a turn is already running.
    #[error("game is already running")]
    AlreadyRunning,
}
