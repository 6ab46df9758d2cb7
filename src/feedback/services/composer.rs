//! Feedback composition: score plus comment.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::FeedbackConfig;
use crate::feedback::adapters::ollama::OllamaCommentGenerator;
use crate::feedback::domain::Score;
use crate::feedback::ports::{CommentGenerator, CommentGeneratorError, FeedbackPrompt};
use crate::task::domain::DurationMinutes;

/// Default upper bound for a generator call.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(10);

/// Where a composed comment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentSource {
    /// Fixed template embedding both durations.
    Template,
    /// External comment generator.
    Generated,
}

/// Score and comment for a completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedFeedback {
    /// Score derived from the durations.
    pub score: Score,
    /// Comment text.
    pub comment: String,
    /// Origin of the comment.
    pub source: CommentSource,
}

/// Composes feedback, optionally phrasing the comment with a generator.
///
/// The generator is bounded by a timeout. Any failure, timeout or blank reply
/// falls back to [`template_comment`], so composition itself never fails.
#[derive(Clone)]
pub struct FeedbackComposer {
    generator: Option<Arc<dyn CommentGenerator>>,
    timeout: Duration,
}

impl fmt::Debug for FeedbackComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackComposer")
            .field("generator", &self.generator.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for FeedbackComposer {
    fn default() -> Self {
        Self::template_only()
    }
}

impl FeedbackComposer {
    /// Creates a composer that always uses the template comment.
    #[must_use]
    pub const fn template_only() -> Self {
        Self {
            generator: None,
            timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Creates a composer that asks `generator` first.
    #[must_use]
    pub fn with_generator(generator: Arc<dyn CommentGenerator>, timeout: Duration) -> Self {
        Self {
            generator: Some(generator),
            timeout,
        }
    }

    /// Builds a composer from configuration, wiring the Ollama generator when
    /// one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`CommentGeneratorError`] when the generator cannot be built.
    pub fn from_config(config: &FeedbackConfig) -> Result<Self, CommentGeneratorError> {
        match &config.generator {
            None => Ok(Self::template_only()),
            Some(generator_config) => {
                let generator = OllamaCommentGenerator::new(generator_config)?;
                tracing::info!(model = generator.model(), "comment generator enabled");
                Ok(Self::with_generator(
                    Arc::new(generator),
                    generator_config.timeout(),
                ))
            }
        }
    }

    /// Returns whether a generator is configured.
    #[must_use]
    pub const fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Scores the durations and produces a comment.
    pub async fn compose(&self, prompt: &FeedbackPrompt) -> ComposedFeedback {
        let score = Score::from_durations(prompt.estimated, prompt.actual);
        match self.generated_comment(prompt).await {
            Some(comment) => ComposedFeedback {
                score,
                comment,
                source: CommentSource::Generated,
            },
            None => ComposedFeedback {
                score,
                comment: template_comment(prompt.estimated, prompt.actual, score),
                source: CommentSource::Template,
            },
        }
    }

    async fn generated_comment(&self, prompt: &FeedbackPrompt) -> Option<String> {
        let generator = self.generator.as_ref()?;
        match tokio::time::timeout(self.timeout, generator.generate(prompt)).await {
            Ok(Ok(comment)) if !comment.trim().is_empty() => Some(comment.trim().to_owned()),
            Ok(Ok(_)) => {
                tracing::warn!("comment generator returned an empty reply, using template");
                None
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "comment generator failed, using template");
                None
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "comment generator timed out, using template");
                None
            }
        }
    }
}

/// Templated comment embedding both durations.
#[must_use]
pub fn template_comment(
    estimated: DurationMinutes,
    actual: DurationMinutes,
    score: Score,
) -> String {
    let verdict = match score.value() {
        5 => "Delivered well ahead of the estimate.",
        4 => "Delivered within the estimate.",
        3 => "Slightly over the estimate.",
        2 => "Noticeably over the estimate; review how the work was scoped.",
        _ => "Far over the estimate; revisit the estimate with your leader.",
    };
    format!("Estimated {estimated} minutes, actual {actual} minutes. {verdict}")
}
