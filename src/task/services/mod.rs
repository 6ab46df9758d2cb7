//! Application services for task lifecycle orchestration.

mod error;
mod lifecycle;
mod view;

pub use error::{ErrorKind, TaskLifecycleError, TaskLifecycleResult};
pub use lifecycle::{CreateTaskRequest, FinishTaskOutcome, TaskLifecycleService};
pub use view::{FinishedTaskViewV1, StatusSummary, TaskTypeSummary, TaskViewV1, UserSummary};
