//! In-memory directory for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::directory::{
    domain::{Status, StatusId, TaskType, TaskTypeId, User, UserId},
    ports::{DirectoryRepository, DirectoryRepositoryError, DirectoryRepositoryResult},
};

/// Thread-safe in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    users: HashMap<UserId, User>,
    username_index: HashMap<String, UserId>,
    task_types: HashMap<TaskTypeId, TaskType>,
    statuses: HashMap<StatusId, Status>,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(err: PoisonError<T>) -> DirectoryRepositoryError {
    DirectoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn status_name_taken(state: &InMemoryDirectoryState, status: &Status) -> bool {
    state
        .statuses
        .values()
        .any(|existing| existing.id() != status.id() && existing.name().matches(status.name().as_str()))
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn store_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.users.contains_key(&user.id()) {
            return Err(DirectoryRepositoryError::DuplicateUser(user.id()));
        }
        let username = user.username().as_str().to_owned();
        if state.username_index.contains_key(&username) {
            return Err(DirectoryRepositoryError::DuplicateUsername(username));
        }
        state.username_index.insert(username, user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let previous_username = state
            .users
            .get(&user.id())
            .ok_or(DirectoryRepositoryError::UserNotFound(user.id()))?
            .username()
            .as_str()
            .to_owned();

        let username = user.username().as_str().to_owned();
        if previous_username != username {
            if state.username_index.contains_key(&username) {
                return Err(DirectoryRepositoryError::DuplicateUsername(username));
            }
            state.username_index.remove(&previous_username);
            state.username_index.insert(username, user.id());
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn remove_user(&self, id: UserId) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removed = state
            .users
            .remove(&id)
            .ok_or(DirectoryRepositoryError::UserNotFound(id))?;
        state.username_index.remove(removed.username().as_str());

        for subordinate in state.users.values_mut().filter(|user| user.reports_to(id)) {
            subordinate
                .assign_leader(None)
                .map_err(DirectoryRepositoryError::persistence)?;
        }
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> DirectoryRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> DirectoryRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .username_index
            .get(username.trim())
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_subordinates(&self, leader_id: UserId) -> DirectoryRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut subordinates: Vec<User> = state
            .users
            .values()
            .filter(|user| user.reports_to(leader_id))
            .cloned()
            .collect();
        subordinates.sort_by(|left, right| left.username().as_str().cmp(right.username().as_str()));
        Ok(subordinates)
    }

    async fn store_task_type(&self, task_type: &TaskType) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let taken = state
            .task_types
            .values()
            .any(|existing| existing.name().matches(task_type.name().as_str()));
        if taken || state.task_types.contains_key(&task_type.id()) {
            return Err(DirectoryRepositoryError::DuplicateCatalogName(
                task_type.name().as_str().to_owned(),
            ));
        }
        state.task_types.insert(task_type.id(), task_type.clone());
        Ok(())
    }

    async fn find_task_type(&self, id: TaskTypeId) -> DirectoryRepositoryResult<Option<TaskType>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.task_types.get(&id).cloned())
    }

    async fn list_task_types(&self) -> DirectoryRepositoryResult<Vec<TaskType>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut task_types: Vec<TaskType> = state.task_types.values().cloned().collect();
        task_types.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(task_types)
    }

    async fn store_status(&self, status: &Status) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.statuses.contains_key(&status.id()) || status_name_taken(&state, status) {
            return Err(DirectoryRepositoryError::DuplicateCatalogName(
                status.name().as_str().to_owned(),
            ));
        }
        state.statuses.insert(status.id(), status.clone());
        Ok(())
    }

    async fn update_status(&self, status: &Status) -> DirectoryRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if !state.statuses.contains_key(&status.id()) {
            return Err(DirectoryRepositoryError::StatusNotFound(status.id()));
        }
        if status_name_taken(&state, status) {
            return Err(DirectoryRepositoryError::DuplicateCatalogName(
                status.name().as_str().to_owned(),
            ));
        }
        state.statuses.insert(status.id(), status.clone());
        Ok(())
    }

    async fn find_status(&self, id: StatusId) -> DirectoryRepositoryResult<Option<Status>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.statuses.get(&id).cloned())
    }

    async fn find_status_by_name(&self, name: &str) -> DirectoryRepositoryResult<Option<Status>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .statuses
            .values()
            .find(|status| status.name().matches(name))
            .cloned())
    }

    async fn list_statuses(&self) -> DirectoryRepositoryResult<Vec<Status>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut statuses: Vec<Status> = state.statuses.values().cloned().collect();
        statuses.sort_by(|left, right| left.name().as_str().cmp(right.name().as_str()));
        Ok(statuses)
    }
}
