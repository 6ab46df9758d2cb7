//! Error types for directory domain validation and parsing.

use super::UserId;
use thiserror::Error;

/// Errors returned while constructing or mutating directory values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The credential hash is empty.
    #[error("credential hash must not be empty")]
    EmptyCredential,

    /// A catalog entry name is empty after trimming.
    #[error("catalog name must not be empty")]
    EmptyCatalogName,

    /// A user was proposed as its own leader.
    #[error("user {0} cannot be its own leader")]
    SelfLeadership(UserId),

    /// Assigning the leader would close a cycle in the leader graph.
    #[error("assigning leader {leader_id} to user {user_id} would create a leader cycle")]
    LeaderCycle {
        /// User receiving the leader.
        user_id: UserId,
        /// Proposed leader.
        leader_id: UserId,
    },

    /// The leader chain above the proposed leader exceeds the supported depth.
    #[error("leader chain above {leader_id} exceeds {max_depth} links")]
    LeaderChainTooDeep {
        /// Proposed leader.
        leader_id: UserId,
        /// Maximum supported chain length.
        max_depth: usize,
    },
}

/// Error returned while parsing user roles from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);
