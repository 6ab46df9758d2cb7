//! Repository port for users and reference catalogs.

use crate::directory::domain::{Status, StatusId, TaskType, TaskTypeId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory repository operations.
pub type DirectoryRepositoryResult<T> = Result<T, DirectoryRepositoryError>;

/// Directory persistence contract.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateUser`] when the ID exists
    /// or [`DirectoryRepositoryError::DuplicateUsername`] when the username is
    /// taken.
    async fn store_user(&self, user: &User) -> DirectoryRepositoryResult<()>;

    /// Persists changes to an existing user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn update_user(&self, user: &User) -> DirectoryRepositoryResult<()>;

    /// Removes a user and clears the leader reference of its subordinates.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::UserNotFound`] when the user does
    /// not exist.
    async fn remove_user(&self, id: UserId) -> DirectoryRepositoryResult<()>;

    /// Finds a user by identifier.
    async fn find_user(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>>;

    /// Finds a user by exact username.
    async fn find_user_by_username(&self, username: &str)
    -> DirectoryRepositoryResult<Option<User>>;

    /// Returns all users whose leader reference equals `leader_id`.
    async fn find_subordinates(&self, leader_id: UserId) -> DirectoryRepositoryResult<Vec<User>>;

    /// Stores a new task type.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateCatalogName`] when a task
    /// type with the same name (case-insensitive) exists.
    async fn store_task_type(&self, task_type: &TaskType) -> DirectoryRepositoryResult<()>;

    /// Finds a task type by identifier.
    async fn find_task_type(&self, id: TaskTypeId) -> DirectoryRepositoryResult<Option<TaskType>>;

    /// Returns every task type.
    async fn list_task_types(&self) -> DirectoryRepositoryResult<Vec<TaskType>>;

    /// Stores a new status.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::DuplicateCatalogName`] when a
    /// status with the same name (case-insensitive) exists.
    async fn store_status(&self, status: &Status) -> DirectoryRepositoryResult<()>;

    /// Persists a renamed status.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryRepositoryError::StatusNotFound`] when the status
    /// does not exist.
    async fn update_status(&self, status: &Status) -> DirectoryRepositoryResult<()>;

    /// Finds a status by identifier.
    async fn find_status(&self, id: StatusId) -> DirectoryRepositoryResult<Option<Status>>;

    /// Finds a status by name, ignoring case and surrounding whitespace.
    async fn find_status_by_name(&self, name: &str) -> DirectoryRepositoryResult<Option<Status>>;

    /// Returns every status.
    async fn list_statuses(&self) -> DirectoryRepositoryResult<Vec<Status>>;
}

/// Errors returned by directory repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryRepositoryError {
    /// A user with the same identifier already exists.
    #[error("duplicate user identifier: {0}")]
    DuplicateUser(UserId),

    /// The username is already taken.
    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    /// The user was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// A catalog entry with the same name already exists.
    #[error("duplicate catalog name: {0}")]
    DuplicateCatalogName(String),

    /// The status was not found.
    #[error("status not found: {0}")]
    StatusNotFound(StatusId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
