//! Port contracts for feedback storage and comment generation.

pub mod generator;
pub mod repository;

pub use generator::{CommentGenerator, CommentGeneratorError, FeedbackPrompt};
pub use repository::{FeedbackRepository, FeedbackRepositoryError, FeedbackRepositoryResult};
