//! Feedback record attached to a completed task.

use super::{FeedbackDomainError, FeedbackId, Score};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Quality feedback for one completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    id: FeedbackId,
    task_id: TaskId,
    score: Score,
    comment: String,
    auto_generated: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing persisted feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedFeedbackData {
    /// Persisted feedback identifier.
    pub id: FeedbackId,
    /// Task the feedback belongs to.
    pub task_id: TaskId,
    /// Persisted score.
    pub score: Score,
    /// Persisted comment.
    pub comment: String,
    /// Whether the feedback was produced by the system.
    pub auto_generated: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Creates system-generated feedback for a task.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackDomainError::EmptyComment`] for a blank comment.
    pub fn automatic(
        task_id: TaskId,
        score: Score,
        comment: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, FeedbackDomainError> {
        let raw_comment = comment.into();
        let trimmed = raw_comment.trim();
        if trimmed.is_empty() {
            return Err(FeedbackDomainError::EmptyComment);
        }

        Ok(Self {
            id: FeedbackId::new(),
            task_id,
            score,
            comment: trimmed.to_owned(),
            auto_generated: true,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs feedback from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedFeedbackData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            score: data.score,
            comment: data.comment,
            auto_generated: data.auto_generated,
            created_at: data.created_at,
        }
    }

    /// Returns the feedback identifier.
    #[must_use]
    pub const fn id(&self) -> FeedbackId {
        self.id
    }

    /// Returns the task this feedback belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the score.
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Returns the comment text.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns whether the system produced this feedback.
    #[must_use]
    pub const fn auto_generated(&self) -> bool {
        self.auto_generated
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
