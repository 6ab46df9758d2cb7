//! End-to-end task lifecycle flows over in-memory stores.

use super::helpers::Team;
use eyre::ensure;
use rstest::rstest;
use task_mirror::directory::{
    domain::Role,
    services::RegisterUserRequest,
};
use task_mirror::task::{
    domain::{Caller, TaskStatus},
    services::ErrorKind,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigned_task_runs_to_completion_with_feedback() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();

    let created = lifecycle
        .create_task(
            &team.leader_caller(),
            team.assignment("Fix login redirect", "60")?,
        )
        .await?;
    ensure!(created.status() == TaskStatus::Pending, "new task should be pending");

    team.clock.advance(chrono::Duration::minutes(5));
    let started = lifecycle
        .start_task(created.id(), &team.member_caller())
        .await?;
    ensure!(started.status() == TaskStatus::InProgress, "task should be in progress");

    team.clock.advance(chrono::Duration::minutes(45));
    let outcome = lifecycle
        .finish_task(created.id(), &team.member_caller())
        .await?;
    ensure!(outcome.task.status() == TaskStatus::Completed, "task should be completed");
    ensure!(outcome.feedback.score().value() == 5, "45 of 60 minutes should score 5");
    ensure!(
        outcome.feedback.comment() == "Estimated 60.00 minutes, actual 45.00 minutes. Delivered well ahead of the estimate.",
        "unexpected comment: {}",
        outcome.feedback.comment()
    );

    let view = serde_json::to_value(lifecycle.project_finished(&outcome).await?)?;
    ensure!(
        view.get("actualDuration").and_then(serde_json::Value::as_f64) == Some(45.0),
        "projection should carry the actual duration"
    );
    ensure!(
        view.pointer("/status/name").and_then(serde_json::Value::as_str) == Some("Completed"),
        "projection should name the completed status"
    );
    ensure!(
        view.pointer("/type/name").and_then(serde_json::Value::as_str) == Some("Bugfix"),
        "projection should name the task type"
    );
    ensure!(
        view.pointer("/assignee/username").and_then(serde_json::Value::as_str) == Some("joao"),
        "projection should name the assignee"
    );
    ensure!(
        view.get("score").and_then(serde_json::Value::as_u64) == Some(5),
        "projection should carry the score"
    );

    let stored = lifecycle.feedback_for(created.id()).await?;
    ensure!(stored.as_ref() == Some(&outcome.feedback), "feedback should be retrievable");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn starting_twice_keeps_the_first_start_time() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Write changelog", "30")?)
        .await?;

    let first = lifecycle.start_task(task.id(), &team.member_caller()).await?;
    team.clock.advance(chrono::Duration::minutes(10));
    let second = lifecycle.start_task(task.id(), &team.member_caller()).await?;

    ensure!(first.started_at().is_some(), "first start should stamp the task");
    ensure!(
        first.started_at() == second.started_at(),
        "repeated start must not move the start time"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finishing_twice_is_rejected_and_feedback_is_unchanged() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Patch parser", "20")?)
        .await?;
    lifecycle.start_task(task.id(), &team.member_caller()).await?;
    team.clock.advance(chrono::Duration::minutes(20));
    let outcome = lifecycle.finish_task(task.id(), &team.member_caller()).await?;

    team.clock.advance(chrono::Duration::minutes(20));
    let second = lifecycle.finish_task(task.id(), &team.member_caller()).await;
    let Err(err) = second else {
        eyre::bail!("second finish should fail");
    };
    ensure!(err.is_already_completed(), "expected already completed, got {err}");
    ensure!(
        lifecycle.feedback_for(task.id()).await? == Some(outcome.feedback),
        "stored feedback must not change"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_finishes_store_a_single_feedback() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Rotate keys", "15")?)
        .await?;
    lifecycle.start_task(task.id(), &team.member_caller()).await?;
    team.clock.advance(chrono::Duration::minutes(12));

    let caller = team.member_caller();
    let (left, right) = tokio::join!(
        lifecycle.finish_task(task.id(), &caller),
        lifecycle.finish_task(task.id(), &caller)
    );

    let successes = [left.is_ok(), right.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    ensure!(successes == 1, "exactly one finish should win, got {successes}");
    let loser = left.err().or_else(|| right.err());
    ensure!(
        loser.is_some_and(|err| err.is_already_completed()),
        "the losing finish should report already completed"
    );
    ensure!(
        lifecycle.feedback_for(task.id()).await?.is_some(),
        "the winning finish should store feedback"
    );
    Ok(())
}

#[rstest]
#[case::leader_starts(true)]
#[case::stranger_starts(false)]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assignee_may_start(#[case] as_leader: bool) -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Tune cache", "40")?)
        .await?;
    let stranger = team
        .directory
        .register_user(RegisterUserRequest::new(
            "ana",
            "argon2$stranger",
            Role::Member,
            "Analyst",
        ))
        .await?;
    let caller = if as_leader {
        team.leader_caller()
    } else {
        Caller::member(stranger.id())
    };

    let result = lifecycle.start_task(task.id(), &caller).await;
    let Err(err) = result else {
        eyre::bail!("start by a non-assignee should fail");
    };
    ensure!(err.kind() == ErrorKind::Forbidden, "expected forbidden, got {err}");
    let reloaded = lifecycle.find_task(task.id()).await?;
    ensure!(
        reloaded.is_some_and(|found| found.status() == TaskStatus::Pending),
        "rejected start must leave the task pending"
    );
    Ok(())
}

#[rstest]
#[case::leader_finishes(true)]
#[case::stranger_finishes(false)]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assignee_may_finish(#[case] as_leader: bool) -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Tune cache", "40")?)
        .await?;
    lifecycle.start_task(task.id(), &team.member_caller()).await?;
    team.clock.advance(chrono::Duration::minutes(30));
    let stranger = team
        .directory
        .register_user(RegisterUserRequest::new(
            "ana",
            "argon2$stranger",
            Role::Member,
            "Analyst",
        ))
        .await?;
    let caller = if as_leader {
        team.leader_caller()
    } else {
        Caller::member(stranger.id())
    };

    let result = lifecycle.finish_task(task.id(), &caller).await;
    let Err(err) = result else {
        eyre::bail!("finish by a non-assignee should fail");
    };
    ensure!(err.kind() == ErrorKind::Forbidden, "expected forbidden, got {err}");
    let reloaded = lifecycle.find_task(task.id()).await?;
    ensure!(
        reloaded.is_some_and(|found| found.status() == TaskStatus::InProgress
            && found.finished_at().is_none()
            && found.actual().is_none()),
        "rejected finish must leave the task in progress"
    );
    ensure!(
        lifecycle.feedback_for(task.id()).await?.is_none(),
        "rejected finish must not store feedback"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_outside_the_hierarchy_stores_nothing() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let other_leader = team
        .directory
        .register_user(RegisterUserRequest::new(
            "beatriz",
            "argon2$other",
            Role::Leader,
            "Design Lead",
        ))
        .await?;
    let outsider = team
        .directory
        .register_user(
            RegisterUserRequest::new("carlos", "argon2$outsider", Role::Member, "Designer")
                .with_leader(other_leader.id()),
        )
        .await?;

    let request = task_mirror::task::services::CreateTaskRequest::new(
        team.leader.id(),
        outsider.id(),
        team.task_type.id(),
        "Redraw icons",
        "25".parse()?,
    );
    let result = lifecycle.create_task(&team.leader_caller(), request).await;
    let Err(err) = result else {
        eyre::bail!("cross-team assignment should fail");
    };
    ensure!(err.code() == "not_subordinate", "unexpected code {}", err.code());
    ensure!(
        lifecycle.tasks_led_by(team.leader.id()).await?.is_empty(),
        "no task should be stored"
    );
    ensure!(
        lifecycle.tasks_assigned_to(outsider.id()).await?.is_empty(),
        "no task should reach the outsider"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_lists_follow_creation_order() -> eyre::Result<()> {
    let team = Team::seeded().await?;
    let lifecycle = team.lifecycle();
    let mut created = Vec::new();
    for description in ["First", "Second", "Third"] {
        created.push(
            lifecycle
                .create_task(&team.leader_caller(), team.assignment(description, "10")?)
                .await?
                .id(),
        );
        team.clock.advance(chrono::Duration::seconds(1));
    }

    let assigned: Vec<_> = lifecycle
        .tasks_assigned_to(team.member.id())
        .await?
        .iter()
        .map(task_mirror::task::domain::Task::id)
        .collect();
    let led: Vec<_> = lifecycle
        .tasks_led_by(team.leader.id())
        .await?
        .iter()
        .map(task_mirror::task::domain::Task::id)
        .collect();
    ensure!(assigned == created, "assignee list should follow creation order");
    ensure!(led == created, "leader list should follow creation order");
    Ok(())
}
