//! Lifecycle status of a task.

use super::ParseTaskStatusError;
use crate::directory::domain::StatusSeed;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Tasks only move forward, one step at a time:
/// `Pending → InProgress → Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been assigned but not started.
    Pending,
    /// Assignee is working on the task.
    InProgress,
    /// Task has been finished and scored.
    Completed,
}

const STATUS_SEEDS: [StatusSeed; 3] = [
    StatusSeed {
        canonical: "Pending",
        aliases: &["pendente", "todo", "to do"],
    },
    StatusSeed {
        canonical: "InProgress",
        aliases: &[
            "in progress",
            "in_progress",
            "em andamento",
            "em progresso",
            "em_progresso",
        ],
    },
    StatusSeed {
        canonical: "Completed",
        aliases: &["done", "finished", "finalizado", "concluida", "concluída"],
    },
];

impl TaskStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Returns the name this status carries in the status catalog.
    #[must_use]
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }

    /// Returns whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Catalog seeds for the three canonical statuses, including legacy
    /// spellings that are normalised on seeding.
    #[must_use]
    pub const fn catalog_seeds() -> &'static [StatusSeed] {
        &STATUS_SEEDS
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
