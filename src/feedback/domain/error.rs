//! Error types for feedback validation.

use thiserror::Error;

/// Errors returned while constructing feedback values.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FeedbackDomainError {
    /// The score lies outside `1..=5`.
    #[error("score {0} is out of range 1..=5")]
    ScoreOutOfRange(i16),

    /// The comment is empty after trimming.
    #[error("feedback comment must not be empty")]
    EmptyComment,
}
