//! Comment generation wired through the lifecycle service.

use super::helpers::Team;
use async_trait::async_trait;
use eyre::ensure;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;
use task_mirror::feedback::{
    ports::{CommentGenerator, CommentGeneratorError, FeedbackPrompt},
    services::FeedbackComposer,
};

struct CannedGenerator(&'static str);

#[async_trait]
impl CommentGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError> {
        Ok(self.0.to_owned())
    }
}

struct UnavailableGenerator;

#[async_trait]
impl CommentGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError> {
        Err(CommentGeneratorError::Status {
            status: 503,
            body: "model loading".to_owned(),
        })
    }
}

struct StalledGenerator;

#[async_trait]
impl CommentGenerator for StalledGenerator {
    async fn generate(&self, _prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_owned())
    }
}

async fn finish_with(generator: Arc<dyn CommentGenerator>) -> eyre::Result<(u8, String)> {
    let team = Team::seeded().await?;
    let lifecycle = team
        .lifecycle()
        .with_composer(FeedbackComposer::with_generator(
            generator,
            Duration::from_millis(50),
        ));
    let task = lifecycle
        .create_task(&team.leader_caller(), team.assignment("Review schema", "90")?)
        .await?;
    lifecycle.start_task(task.id(), &team.member_caller()).await?;
    team.clock.advance(chrono::Duration::minutes(95));
    let outcome = lifecycle.finish_task(task.id(), &team.member_caller()).await?;
    Ok((
        outcome.feedback.score().value(),
        outcome.feedback.comment().to_owned(),
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn generated_comment_is_stored() -> eyre::Result<()> {
    let (score, comment) =
        finish_with(Arc::new(CannedGenerator("  Close to plan, nice work.  "))).await?;
    ensure!(score == 3, "95 of 90 minutes should score 3, got {score}");
    ensure!(comment == "Close to plan, nice work.", "unexpected comment: {comment}");
    Ok(())
}

#[rstest]
#[case::failing(Arc::new(UnavailableGenerator) as Arc<dyn CommentGenerator>)]
#[case::timing_out(Arc::new(StalledGenerator) as Arc<dyn CommentGenerator>)]
#[case::blank(Arc::new(CannedGenerator("   ")) as Arc<dyn CommentGenerator>)]
#[tokio::test(flavor = "multi_thread")]
async fn generator_problems_fall_back_to_the_template(
    #[case] generator: Arc<dyn CommentGenerator>,
) -> eyre::Result<()> {
    let (score, comment) = finish_with(generator).await?;
    ensure!(score == 3, "score must not depend on the generator");
    ensure!(
        comment == "Estimated 90.00 minutes, actual 95.00 minutes. Slightly over the estimate.",
        "unexpected comment: {comment}"
    );
    Ok(())
}
