//! Port for optional natural-language comment generation.

use crate::task::domain::DurationMinutes;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Facts a generator may use to phrase a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackPrompt {
    /// Task description.
    pub description: String,
    /// Estimated duration.
    pub estimated: DurationMinutes,
    /// Measured duration.
    pub actual: DurationMinutes,
}

/// Produces a short comment about a completed task.
#[async_trait]
pub trait CommentGenerator: Send + Sync {
    /// Generates a comment for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`CommentGeneratorError`] when the prompt cannot be rendered
    /// or the backend fails.
    async fn generate(&self, prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError>;
}

/// Errors raised by comment generators.
#[derive(Debug, Clone, Error)]
pub enum CommentGeneratorError {
    /// The prompt template failed to render.
    #[error("failed to render prompt: {0}")]
    Prompt(String),

    /// The request could not be sent or its reply decoded.
    #[error("generator request failed: {0}")]
    Request(Arc<dyn std::error::Error + Send + Sync>),

    /// The backend answered with a non-success status.
    #[error("generator returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
}

impl CommentGeneratorError {
    /// Wraps a transport or decoding error.
    pub fn request(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Request(Arc::new(err))
    }
}
