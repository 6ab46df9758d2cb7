//! Caller identity and the single authorization predicate for task actions.

use crate::directory::domain::{Role, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Authenticated caller, as supplied by the external auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    /// Creates a caller identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Convenience constructor for a leader caller.
    #[must_use]
    pub const fn leader(user_id: UserId) -> Self {
        Self::new(user_id, Role::Leader)
    }

    /// Convenience constructor for a member caller.
    #[must_use]
    pub const fn member(user_id: UserId) -> Self {
        Self::new(user_id, Role::Member)
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Lifecycle action being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Assign a new task to a subordinate.
    Create,
    /// Start an assigned task.
    Start,
    /// Finish a started task.
    Finish,
}

impl TaskAction {
    /// Returns the role allowed to perform this action.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::Create => Role::Leader,
            Self::Start | Self::Finish => Role::Member,
        }
    }

    /// Returns a stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Finish => "finish",
        }
    }
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason an action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// The caller's role may not perform the action.
    #[error("role {role} may not {action} tasks")]
    RoleNotPermitted {
        /// Attempted action.
        action: TaskAction,
        /// Caller role.
        role: Role,
    },

    /// The caller does not own the resource.
    #[error("user {user_id} may not {action} a task owned by {owner_id}")]
    NotOwner {
        /// Attempted action.
        action: TaskAction,
        /// Caller identifier.
        user_id: UserId,
        /// Owner of the resource.
        owner_id: UserId,
    },
}

/// Decides whether `caller` may perform `action` on a resource owned by
/// `owner_id`.
///
/// For [`TaskAction::Create`] the owner is the leader the task is created
/// under; for [`TaskAction::Start`] and [`TaskAction::Finish`] it is the
/// task's assignee.
///
/// # Errors
///
/// Returns [`AccessDenied`] when the role or ownership check fails.
pub fn authorize(caller: &Caller, action: TaskAction, owner_id: UserId) -> Result<(), AccessDenied> {
    if caller.role() != action.required_role() {
        return Err(AccessDenied::RoleNotPermitted {
            action,
            role: caller.role(),
        });
    }
    if caller.user_id() != owner_id {
        return Err(AccessDenied::NotOwner {
            action,
            user_id: caller.user_id(),
            owner_id,
        });
    }
    Ok(())
}
