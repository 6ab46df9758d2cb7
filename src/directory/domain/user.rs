//! User records and the leader/subordinate relation.

use super::{DirectoryDomainError, ParseRoleError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May create tasks for subordinates.
    Leader,
    /// May start and finish tasks assigned to them.
    Member,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leader => "LEADER",
            Self::Member => "MEMBER",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "leader" | "lider" => Ok(Self::Leader),
            "member" | "user" | "colaborador" => Ok(Self::Member),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, trimmed username.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyUsername`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque credential secret (already hashed by the authentication layer).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wraps a credential hash.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyCredential`] for an empty value.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let hash = value.into();
        if hash.is_empty() {
            return Err(DirectoryDomainError::EmptyCredential);
        }
        Ok(Self(hash))
    }

    /// Exposes the stored hash for persistence adapters.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Directory user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: Username,
    credential: CredentialHash,
    role: Role,
    job_function: String,
    leader_id: Option<UserId>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted credential hash.
    pub credential: CredentialHash,
    /// Persisted role.
    pub role: Role,
    /// Persisted job function.
    pub job_function: String,
    /// Persisted leader reference, if any.
    pub leader_id: Option<UserId>,
}

impl User {
    /// Creates a new user without a leader.
    #[must_use]
    pub fn new(
        username: Username,
        credential: CredentialHash,
        role: Role,
        job_function: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username,
            credential,
            role,
            job_function: job_function.into().trim().to_owned(),
            leader_id: None,
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            credential: data.credential,
            role: data.role,
            job_function: data.job_function,
            leader_id: data.leader_id,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the credential hash.
    #[must_use]
    pub const fn credential(&self) -> &CredentialHash {
        &self.credential
    }

    /// Returns the user role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the job function.
    #[must_use]
    pub fn job_function(&self) -> &str {
        &self.job_function
    }

    /// Returns the leader reference, if any.
    #[must_use]
    pub const fn leader_id(&self) -> Option<UserId> {
        self.leader_id
    }

    /// Returns whether this user reports directly to `leader_id`.
    #[must_use]
    pub fn reports_to(&self, leader_id: UserId) -> bool {
        self.leader_id == Some(leader_id)
    }

    /// Sets or clears the leader reference.
    ///
    /// Only the self-reference is rejected here; cycle detection across the
    /// leader graph needs the directory and lives in the directory service.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::SelfLeadership`] when `leader_id`
    /// equals this user's identifier.
    pub fn assign_leader(&mut self, leader_id: Option<UserId>) -> Result<(), DirectoryDomainError> {
        if leader_id == Some(self.id) {
            return Err(DirectoryDomainError::SelfLeadership(self.id));
        }
        self.leader_id = leader_id;
        Ok(())
    }
}
