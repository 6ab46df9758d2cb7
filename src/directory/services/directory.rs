//! Service layer for user registration, leader assignment and catalog
//! seeding.

use crate::directory::{
    domain::{
        CatalogName, CredentialHash, DirectoryDomainError, Role, Status, StatusSeed, TaskType,
        User, UserId, Username,
    },
    ports::{DirectoryRepository, DirectoryRepositoryError},
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Longest leader chain accepted above a newly assigned leader.
pub const MAX_LEADER_CHAIN_DEPTH: usize = 64;

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    credential_hash: String,
    role: Role,
    job_function: String,
    leader_id: Option<UserId>,
}

impl RegisterUserRequest {
    /// Creates a request with required user fields.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        credential_hash: impl Into<String>,
        role: Role,
        job_function: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            credential_hash: credential_hash.into(),
            role,
            job_function: job_function.into(),
            leader_id: None,
        }
    }

    /// Sets the leader the user reports to.
    #[must_use]
    pub const fn with_leader(mut self, leader_id: UserId) -> Self {
        self.leader_id = Some(leader_id);
        self
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DirectoryRepositoryError),
    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),
    /// The proposed leader does not exist.
    #[error("leader {0} not found")]
    LeaderNotFound(UserId),
    /// The proposed leader does not hold the leader role.
    #[error("user {0} does not hold the leader role")]
    NotALeader(UserId),
}

/// Result type for directory service operations.
pub type DirectoryServiceResult<T> = Result<T, DirectoryServiceError>;

/// Directory orchestration service.
#[derive(Clone)]
pub struct DirectoryService<R>
where
    R: DirectoryRepository,
{
    repository: Arc<R>,
}

impl<R> DirectoryService<R>
where
    R: DirectoryRepository,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Registers a new user, optionally attached to an existing leader.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when validation fails, the leader
    /// does not exist or is not a leader, or the repository rejects the
    /// username.
    pub async fn register_user(&self, request: RegisterUserRequest) -> DirectoryServiceResult<User> {
        let RegisterUserRequest {
            username,
            credential_hash,
            role,
            job_function,
            leader_id,
        } = request;

        let mut user = User::new(
            Username::new(username)?,
            CredentialHash::new(credential_hash)?,
            role,
            job_function,
        );
        if let Some(leader) = leader_id {
            self.require_leader(leader).await?;
            user.assign_leader(Some(leader))?;
        }

        self.repository.store_user(&user).await?;
        info!(user_id = %user.id(), role = %user.role(), "registered user");
        Ok(user)
    }

    /// Sets or clears a user's leader.
    ///
    /// The leader graph must stay acyclic: a user cannot lead itself, nor any
    /// user above it in its own chain.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::UserNotFound`],
    /// [`DirectoryServiceError::LeaderNotFound`],
    /// [`DirectoryServiceError::NotALeader`] when the target holds the member
    /// role, or a domain error for self-leadership, cycles and overlong
    /// chains.
    pub async fn assign_leader(
        &self,
        user_id: UserId,
        leader_id: Option<UserId>,
    ) -> DirectoryServiceResult<User> {
        let mut user = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or(DirectoryServiceError::UserNotFound(user_id))?;

        if let Some(leader) = leader_id {
            if leader == user_id {
                return Err(DirectoryDomainError::SelfLeadership(user_id).into());
            }
            self.require_leader(leader).await?;
            self.ensure_acyclic(user_id, leader).await?;
        }

        user.assign_leader(leader_id)?;
        self.repository.update_user(&user).await?;
        debug!(user_id = %user_id, leader_id = ?leader_id, "leader assignment updated");
        Ok(user)
    }

    /// Removes a user; its subordinates are left without a leader.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the user does not
    /// exist or persistence fails.
    pub async fn remove_user(&self, user_id: UserId) -> DirectoryServiceResult<()> {
        self.repository.remove_user(user_id).await?;
        info!(user_id = %user_id, "removed user");
        Ok(())
    }

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn find_user(&self, user_id: UserId) -> DirectoryServiceResult<Option<User>> {
        Ok(self.repository.find_user(user_id).await?)
    }

    /// Lists the direct subordinates of a leader.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn subordinates_of(&self, leader_id: UserId) -> DirectoryServiceResult<Vec<User>> {
        Ok(self.repository.find_subordinates(leader_id).await?)
    }

    /// Registers a task type.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] for blank or duplicate names.
    pub async fn register_task_type(
        &self,
        name: impl Into<String> + Send,
    ) -> DirectoryServiceResult<TaskType> {
        let task_type = TaskType::new(CatalogName::new(name)?);
        self.repository.store_task_type(&task_type).await?;
        Ok(task_type)
    }

    /// Ensures each named task type exists, returning the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when a name is blank or persistence
    /// fails.
    pub async fn ensure_task_types(&self, names: &[&str]) -> DirectoryServiceResult<Vec<TaskType>> {
        let existing = self.repository.list_task_types().await?;
        for name in names {
            if existing.iter().any(|task_type| task_type.name().matches(name)) {
                continue;
            }
            let task_type = TaskType::new(CatalogName::new(*name)?);
            self.repository.store_task_type(&task_type).await?;
            info!(name = %task_type.name(), "seeded task type");
        }
        Ok(self.repository.list_task_types().await?)
    }

    /// Seeds the status catalog.
    ///
    /// Statuses stored under a legacy alias are renamed to their canonical
    /// name in place, keeping identifiers stable for existing tasks; any
    /// canonical name still missing afterwards is inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when persistence fails.
    pub async fn ensure_status_catalog(
        &self,
        seeds: &[StatusSeed],
    ) -> DirectoryServiceResult<Vec<Status>> {
        for seed in seeds {
            let statuses = self.repository.list_statuses().await?;
            let canonical_present = statuses
                .iter()
                .any(|status| status.name().matches(seed.canonical));

            if !canonical_present {
                if let Some(mut legacy) = statuses
                    .into_iter()
                    .find(|status| seed.is_alias(status.name()))
                {
                    let previous = legacy.name().to_string();
                    legacy.rename(CatalogName::new(seed.canonical)?);
                    self.repository.update_status(&legacy).await?;
                    info!(from = %previous, to = seed.canonical, "normalised legacy status name");
                } else {
                    let status = Status::new(CatalogName::new(seed.canonical)?);
                    self.repository.store_status(&status).await?;
                    info!(name = seed.canonical, "seeded status");
                }
            }
        }
        Ok(self.repository.list_statuses().await?)
    }

    async fn require_leader(&self, leader_id: UserId) -> DirectoryServiceResult<User> {
        let leader = self
            .repository
            .find_user(leader_id)
            .await?
            .ok_or(DirectoryServiceError::LeaderNotFound(leader_id))?;
        if leader.role() != Role::Leader {
            return Err(DirectoryServiceError::NotALeader(leader_id));
        }
        Ok(leader)
    }

    /// Walks upward from `leader_id` and fails if `user_id` is reached, a
    /// pre-existing loop is found, or the chain is longer than
    /// [`MAX_LEADER_CHAIN_DEPTH`].
    async fn ensure_acyclic(&self, user_id: UserId, leader_id: UserId) -> DirectoryServiceResult<()> {
        let cycle = DirectoryDomainError::LeaderCycle { user_id, leader_id };
        let mut visited = HashSet::new();
        let mut cursor = Some(leader_id);

        while let Some(current) = cursor {
            if current == user_id || !visited.insert(current) {
                return Err(cycle.into());
            }
            if visited.len() > MAX_LEADER_CHAIN_DEPTH {
                return Err(DirectoryDomainError::LeaderChainTooDeep {
                    leader_id,
                    max_depth: MAX_LEADER_CHAIN_DEPTH,
                }
                .into());
            }
            cursor = self
                .repository
                .find_user(current)
                .await?
                .and_then(|user| user.leader_id());
        }
        Ok(())
    }
}
