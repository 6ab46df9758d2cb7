//! Comment generator backed by a local Ollama server.

use async_trait::async_trait;
use minijinja::{Environment, context};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::CommentGeneratorConfig;
use crate::feedback::ports::{CommentGenerator, CommentGeneratorError, FeedbackPrompt};

const PROMPT_TEMPLATE: &str = "\
You are a team leader reviewing how a team member carried out a task.

Rules:
- Write a short paragraph of two to four sentences.
- Be polite, objective and constructive.
- Do not mention that you are an AI or a language model.
{% if late %}- The task ran over its estimate: focus on improvement without belittling.
{% else %}- The task finished on or ahead of its estimate: acknowledge the good work.
{% endif %}
Task:
- Description: {{ description }}
- Estimated time: {{ estimated }} minutes
- Actual time: {{ actual }} minutes

Reply with the feedback text only, no title and no list.";

/// Ollama `/api/generate` client.
#[derive(Debug, Clone)]
pub struct OllamaCommentGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaCommentGenerator {
    /// Creates a generator from configuration.
    ///
    /// The HTTP client's own timeout matches the configured generation
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CommentGeneratorError::Request`] when the HTTP client cannot
    /// be built.
    pub fn new(config: &CommentGeneratorConfig) -> Result<Self, CommentGeneratorError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(CommentGeneratorError::request)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
        })
    }

    /// Returns the model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Renders the generation prompt for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`CommentGeneratorError::Prompt`] when rendering fails.
    pub fn render_prompt(prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError> {
        let environment = Environment::new();
        environment
            .render_str(
                PROMPT_TEMPLATE,
                context! {
                    description => prompt.description.as_str(),
                    estimated => prompt.estimated.to_string(),
                    actual => prompt.actual.to_string(),
                    late => prompt.actual > prompt.estimated,
                },
            )
            .map_err(|err| CommentGeneratorError::Prompt(err.to_string()))
    }
}

#[async_trait]
impl CommentGenerator for OllamaCommentGenerator {
    async fn generate(&self, prompt: &FeedbackPrompt) -> Result<String, CommentGeneratorError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: Self::render_prompt(prompt)?,
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(CommentGeneratorError::request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommentGeneratorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(CommentGeneratorError::request)?;
        tracing::debug!(model = %self.model, chars = reply.response.len(), "comment generated");
        Ok(reply.response.trim().to_owned())
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}
