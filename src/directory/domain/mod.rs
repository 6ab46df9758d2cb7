//! Domain model for the user directory and reference catalogs.
//!
//! Users carry the leader/subordinate relation consumed by task creation.
//! Task types and statuses are plain named records; statuses additionally
//! carry the canonical lifecycle names the task engine resolves at runtime.

mod catalog;
mod error;
mod ids;
mod user;

pub use catalog::{CatalogName, Status, StatusSeed, TaskType};
pub use error::{DirectoryDomainError, ParseRoleError};
pub use ids::{StatusId, TaskTypeId, UserId};
pub use user::{CredentialHash, PersistedUserData, Role, User, Username};
