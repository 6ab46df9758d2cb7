//! Diesel schema for feedback persistence.

diesel::table! {
    /// Feedback records, one per task.
    feedbacks (id) {
        /// Feedback identifier.
        id -> Uuid,
        /// Task reference, unique.
        task_id -> Uuid,
        /// Score in `1..=5`.
        score -> Int2,
        /// Comment text.
        comment -> Text,
        /// Whether the system produced the feedback.
        auto_generated -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
