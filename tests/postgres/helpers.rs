//! Shared fixtures for `PostgreSQL` integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use super::cluster::{TemporaryDatabase, boxed};
use crate::test_helpers::SteppedClock;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use rstest::fixture;
use std::sync::Arc;
use task_mirror::config::DatabaseConfig;
use task_mirror::directory::{
    adapters::postgres::PostgresDirectory,
    domain::{Role, TaskType, User},
    services::{DirectoryService, RegisterUserRequest},
};
use task_mirror::feedback::adapters::postgres::PostgresFeedbackRepository;
use task_mirror::persistence::build_pool;
use task_mirror::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Caller, DurationMinutes, Task, TaskStatus},
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Schema applied to the template database.
pub const CREATE_TABLES_SQL: &str =
    include_str!("../../migrations/2024-05-01-000000_create_task_mirror_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "task_mirror_test_template";

/// Lifecycle service wired to the diesel adapters.
pub type PgLifecycle = TaskLifecycleService<
    PostgresTaskRepository,
    PostgresDirectory,
    PostgresFeedbackRepository,
    SteppedClock,
>;

fn apply_migrations(url: &str) -> Result<(), BoxError> {
    let mut connection = PgConnection::establish(url).map_err(boxed)?;
    connection.batch_execute(CREATE_TABLES_SQL).map_err(boxed)?;
    Ok(())
}

/// A migrated database seeded with one leader, one subordinate, the status
/// catalog and a task type.
pub struct PgContext {
    /// Task store over the temporary database.
    pub tasks: Arc<PostgresTaskRepository>,
    /// Feedback store over the temporary database.
    pub feedback: Arc<PostgresFeedbackRepository>,
    /// Test clock shared with the lifecycle service.
    pub clock: Arc<SteppedClock>,
    /// Leader user.
    pub leader: User,
    /// Subordinate of `leader`.
    pub member: User,
    /// Task type used for created tasks.
    pub task_type: TaskType,
    directory: Arc<PostgresDirectory>,
    _database: TemporaryDatabase,
}

impl PgContext {
    /// Builds a lifecycle service over this context's stores.
    pub fn lifecycle(&self) -> PgLifecycle {
        TaskLifecycleService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.directory),
            Arc::clone(&self.feedback),
            Arc::clone(&self.clock),
        )
    }

    /// Caller identity for the leader.
    pub fn leader_caller(&self) -> Caller {
        Caller::leader(self.leader.id())
    }

    /// Caller identity for the subordinate.
    pub fn member_caller(&self) -> Caller {
        Caller::member(self.member.id())
    }

    /// Creates a pending task for the subordinate through the lifecycle
    /// service, so every foreign key is satisfied.
    pub async fn pending_task(&self, description: &str, estimate: &str) -> Result<Task, BoxError> {
        let request = CreateTaskRequest::new(
            self.leader.id(),
            self.member.id(),
            self.task_type.id(),
            description,
            estimate.parse::<DurationMinutes>().map_err(boxed)?,
        );
        let task = self
            .lifecycle()
            .create_task(&self.leader_caller(), request)
            .await
            .map_err(boxed)?;
        Ok(task)
    }
}

async fn seed_context(cluster: PostgresCluster) -> Result<PgContext, BoxError> {
    cluster.ensure_template(TEMPLATE_DB, apply_migrations)?;
    let database = cluster.temporary_database(TEMPLATE_DB)?;
    let pool = build_pool(&DatabaseConfig {
        url: database.url().to_owned(),
        max_connections: 4,
        ..DatabaseConfig::default()
    })
    .map_err(boxed)?;

    let directory = Arc::new(PostgresDirectory::new(pool.clone()));
    let service = DirectoryService::new(Arc::clone(&directory));
    service
        .ensure_status_catalog(TaskStatus::catalog_seeds())
        .await
        .map_err(boxed)?;
    let task_type = service.register_task_type("Bugfix").await.map_err(boxed)?;
    let leader = service
        .register_user(RegisterUserRequest::new(
            "marina",
            "argon2$leader",
            Role::Leader,
            "Engineering Manager",
        ))
        .await
        .map_err(boxed)?;
    let member = service
        .register_user(
            RegisterUserRequest::new("joao", "argon2$member", Role::Member, "Developer")
                .with_leader(leader.id()),
        )
        .await
        .map_err(boxed)?;

    Ok(PgContext {
        tasks: Arc::new(PostgresTaskRepository::new(pool.clone())),
        feedback: Arc::new(PostgresFeedbackRepository::new(pool)),
        clock: Arc::new(SteppedClock::new()),
        leader,
        member,
        task_type,
        directory,
        _database: database,
    })
}

/// Seeded database context for a single test.
#[fixture]
pub async fn pg_context(postgres_cluster: PostgresCluster) -> Result<PgContext, BoxError> {
    seed_context(postgres_cluster).await
}
