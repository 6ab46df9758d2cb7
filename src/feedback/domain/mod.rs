//! Domain model for task feedback.
//!
//! A feedback record is created once per task at completion. Its score is a
//! pure function of the estimated and measured durations.

mod error;
mod feedback;
mod ids;
mod score;

pub use error::FeedbackDomainError;
pub use feedback::{Feedback, PersistedFeedbackData};
pub use ids::FeedbackId;
pub use score::Score;
