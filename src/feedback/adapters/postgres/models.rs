//! Diesel row models for feedback persistence.

use super::schema::feedbacks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Row model for feedback records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = feedbacks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    /// Feedback identifier.
    pub id: uuid::Uuid,
    /// Task reference.
    pub task_id: uuid::Uuid,
    /// Score in `1..=5`.
    pub score: i16,
    /// Comment text.
    pub comment: String,
    /// Whether the system produced the feedback.
    pub auto_generated: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
