//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Assigned tasks with their lifecycle timestamps.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Free-text description.
        description -> Text,
        /// Estimate in hundredths of a minute.
        estimated_hundredths -> Int4,
        /// Measured duration in hundredths of a minute.
        actual_hundredths -> Nullable<Int4>,
        /// Assignee reference.
        assignee_id -> Uuid,
        /// Creating leader reference.
        leader_id -> Uuid,
        /// Task type reference.
        task_type_id -> Uuid,
        /// Lifecycle state.
        #[max_length = 50]
        state -> Varchar,
        /// Status catalog reference.
        status_id -> Uuid,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// End timestamp.
        finished_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}
