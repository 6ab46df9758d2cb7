//! Diesel schema for the user directory and reference catalogs.

diesel::table! {
    /// Directory users with the self-referencing leader relation.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique login name.
        #[max_length = 100]
        username -> Varchar,
        /// Opaque credential hash.
        credential_hash -> Text,
        /// Role name (`LEADER` or `MEMBER`).
        #[max_length = 20]
        role -> Varchar,
        /// Job function label.
        #[max_length = 100]
        job_function -> Varchar,
        /// Leader reference, cleared when the leader is deleted.
        leader_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Task type catalog.
    task_types (id) {
        /// Task type identifier.
        id -> Uuid,
        /// Display name, unique ignoring case.
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    /// Task status catalog.
    task_statuses (id) {
        /// Status identifier.
        id -> Uuid,
        /// Display name, unique ignoring case.
        #[max_length = 100]
        name -> Varchar,
    }
}
