//! Domain model for the task lifecycle.
//!
//! Covers the task aggregate and its forward-only status machine, exact
//! minute durations, and the authorization predicate every lifecycle
//! operation evaluates once. Infrastructure concerns stay outside the domain
//! boundary.

mod access;
mod duration;
mod error;
mod ids;
mod status;
mod task;

pub use access::{AccessDenied, Caller, TaskAction, authorize};
pub use duration::DurationMinutes;
pub use error::{ParseDurationError, ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, StartOutcome, Task};
