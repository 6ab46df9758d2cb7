//! Create, start and finish flows over the diesel adapters.

use crate::postgres::helpers::{BoxError, PgContext, pg_context};
use chrono::Duration;
use rstest::rstest;
use task_mirror::task::domain::{DurationMinutes, TaskStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_task_runs_from_creation_to_feedback(
    #[future] pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context.await?;
    let lifecycle = ctx.lifecycle();
    let created = ctx.pending_task("Fix login redirect", "60").await?;

    ctx.clock.advance(Duration::minutes(5));
    let started = lifecycle
        .start_task(created.id(), &ctx.member_caller())
        .await
        .expect("assignee should start the task");
    assert_eq!(started.status(), TaskStatus::InProgress);

    ctx.clock.advance(Duration::minutes(45));
    let outcome = lifecycle
        .finish_task(created.id(), &ctx.member_caller())
        .await
        .expect("assignee should finish the task");
    assert_eq!(outcome.feedback.score().value(), 5);
    assert!(outcome.feedback.auto_generated());

    let stored = lifecycle
        .find_task(created.id())
        .await
        .expect("lookup should succeed")
        .expect("task should be stored");
    assert_eq!(stored, outcome.task);
    assert_eq!(stored.status(), TaskStatus::Completed);
    assert_eq!(stored.actual(), DurationMinutes::from_minutes(45));
    let feedback = lifecycle
        .feedback_for(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(feedback, Some(outcome.feedback.clone()));

    let view = serde_json::to_value(
        lifecycle
            .project_finished(&outcome)
            .await
            .expect("projection should resolve names"),
    )?;
    assert_eq!(
        view.pointer("/status/name").and_then(serde_json::Value::as_str),
        Some("Completed")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn postgres_concurrent_finishes_store_one_feedback(
    #[future] pg_context: Result<PgContext, BoxError>,
) -> Result<(), BoxError> {
    let ctx = pg_context.await?;
    let lifecycle = ctx.lifecycle();
    let task = ctx.pending_task("Rotate keys", "15").await?;
    lifecycle
        .start_task(task.id(), &ctx.member_caller())
        .await
        .expect("assignee should start the task");
    ctx.clock.advance(Duration::minutes(12));

    let caller = ctx.member_caller();
    let (left, right) = tokio::join!(
        lifecycle.finish_task(task.id(), &caller),
        lifecycle.finish_task(task.id(), &caller)
    );

    assert_eq!(usize::from(left.is_ok()) + usize::from(right.is_ok()), 1);
    let loser = left.err().or_else(|| right.err());
    assert!(
        loser.as_ref().is_some_and(|err| err.is_already_completed()),
        "the losing finish should report already completed, got: {loser:?}"
    );
    assert!(
        lifecycle
            .feedback_for(task.id())
            .await
            .expect("lookup should succeed")
            .is_some()
    );
    Ok(())
}
