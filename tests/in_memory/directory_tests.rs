//! Directory flows the lifecycle engine depends on.

use super::helpers::Team;
use eyre::ensure;
use rstest::rstest;
use std::sync::Arc;
use task_mirror::directory::{
    adapters::memory::InMemoryDirectory,
    domain::{CatalogName, DirectoryDomainError, Role, Status},
    ports::DirectoryRepository,
    services::{DirectoryService, DirectoryServiceError, RegisterUserRequest},
};
use task_mirror::task::{domain::TaskStatus, services::ErrorKind};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn leader_cycles_are_refused() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let deputy = team
        .directory
        .register_user(
            RegisterUserRequest::new("rui", "argon2$deputy", Role::Leader, "Team Lead")
                .with_leader(team.leader.id()),
        )
        .await?;

    let result = team
        .directory
        .assign_leader(team.leader.id(), Some(deputy.id()))
        .await;

    ensure!(
        matches!(
            result,
            Err(DirectoryServiceError::Domain(DirectoryDomainError::LeaderCycle { .. }))
        ),
        "closing the loop should be refused"
    );
    let leader = team.directory.find_user(team.leader.id()).await?;
    ensure!(
        leader.is_some_and(|user| user.leader_id().is_none()),
        "refused assignment must not be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_cannot_lead() -> eyre::Result<()> {
    let team = Team::seeded().await?;

    let result = team
        .directory
        .assign_leader(team.leader.id(), Some(team.member.id()))
        .await;

    ensure!(
        matches!(result, Err(DirectoryServiceError::NotALeader(id)) if id == team.member.id()),
        "a member cannot be assigned as leader"
    );
    ensure!(
        team.directory.subordinates_of(team.member.id()).await?.is_empty(),
        "refused assignment must not be stored"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_a_leader_detaches_subordinates() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();

    team.directory.remove_user(team.leader.id()).await?;

    let member = team.directory.find_user(team.member.id()).await?;
    ensure!(
        member.is_some_and(|user| user.leader_id().is_none()),
        "subordinate should lose its leader"
    );
    let result = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Orphaned", "10")?)
        .await;
    let Err(err) = result else {
        eyre::bail!("a removed leader cannot assign tasks");
    };
    ensure!(err.kind() == ErrorKind::Validation, "expected validation, got {err}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_status_names_keep_their_identifiers() -> eyre::Result<()> {
    let store = Arc::new(InMemoryDirectory::new());
    let legacy = Status::new(CatalogName::new("em andamento")?);
    store.store_status(&legacy).await?;
    let directory = DirectoryService::new(Arc::clone(&store));

    let catalog = directory
        .ensure_status_catalog(TaskStatus::catalog_seeds())
        .await?;

    ensure!(catalog.len() == 3, "catalog should hold one entry per status");
    let in_progress = store
        .find_status_by_name(TaskStatus::InProgress.canonical_name())
        .await?;
    ensure!(
        in_progress.is_some_and(|status| status.id() == legacy.id()),
        "legacy entry should be renamed in place"
    );

    let reseeded = directory
        .ensure_status_catalog(TaskStatus::catalog_seeds())
        .await?;
    ensure!(reseeded.len() == 3, "seeding twice must not add entries");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unseeded_catalog_is_a_configuration_error() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let empty = Arc::new(InMemoryDirectory::new());
    let lifecycle = task_mirror::task::services::TaskLifecycleService::new(
        Arc::new(task_mirror::task::adapters::memory::InMemoryTaskRepository::new()),
        empty,
        Arc::new(task_mirror::feedback::adapters::memory::InMemoryFeedbackRepository::new()),
        Arc::clone(&team.clock),
    );

    let Err(err) = lifecycle.resolve_status(TaskStatus::Pending).await else {
        eyre::bail!("an empty catalog has no pending status");
    };
    ensure!(err.kind() == ErrorKind::Configuration, "expected configuration, got {err}");
    Ok(())
}
