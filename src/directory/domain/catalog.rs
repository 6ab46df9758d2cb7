//! Reference catalogs: task types and statuses.

use super::{DirectoryDomainError, StatusId, TaskTypeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, non-empty catalog entry name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogName(String);

impl CatalogName {
    /// Creates a validated catalog name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyCatalogName`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyCatalogName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used by catalog lookups.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for CatalogName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task type catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskType {
    id: TaskTypeId,
    name: CatalogName,
}

impl TaskType {
    /// Creates a new task type.
    #[must_use]
    pub fn new(name: CatalogName) -> Self {
        Self {
            id: TaskTypeId::new(),
            name,
        }
    }

    /// Reconstructs a task type from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: TaskTypeId, name: CatalogName) -> Self {
        Self { id, name }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> TaskTypeId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &CatalogName {
        &self.name
    }
}

/// Status catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    id: StatusId,
    name: CatalogName,
}

impl Status {
    /// Creates a new status.
    #[must_use]
    pub fn new(name: CatalogName) -> Self {
        Self {
            id: StatusId::new(),
            name,
        }
    }

    /// Reconstructs a status from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: StatusId, name: CatalogName) -> Self {
        Self { id, name }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub const fn name(&self) -> &CatalogName {
        &self.name
    }

    /// Renames the status, keeping its identifier.
    pub fn rename(&mut self, name: CatalogName) {
        self.name = name;
    }
}

/// Seed describing one canonical status and the legacy spellings that
/// should be normalised to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSeed {
    /// Canonical status name.
    pub canonical: &'static str,
    /// Legacy names renamed to the canonical name when found.
    pub aliases: &'static [&'static str],
}

impl StatusSeed {
    /// Returns whether `name` is the canonical name or one of its aliases.
    #[must_use]
    pub fn recognises(&self, name: &CatalogName) -> bool {
        name.matches(self.canonical) || self.is_alias(name)
    }

    /// Returns whether `name` is a legacy alias (not the canonical name).
    #[must_use]
    pub fn is_alias(&self, name: &CatalogName) -> bool {
        self.aliases.iter().any(|alias| name.matches(alias))
    }
}
