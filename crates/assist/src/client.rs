//! Chat-completion backed implementation of [`AssistService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shelf_books::assist::{
    MERGE_INPUT_CHARS, SUMMARY_INPUT_CHARS, TAGS_INPUT_CHARS, TITLE_INPUT_CHARS,
};
use shelf_books::{AssistError, AssistService, MERGE_SEPARATOR};
use shelf_kernel::settings::AssistSettings;
use tracing::{debug, info};

use crate::text::{clean_title, parse_tags, truncate};
use crate::types::*;

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
}

impl From<&AssistSettings> for AssistConfig {
    fn from(settings: &AssistSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout_seconds: settings.timeout_seconds,
        }
    }
}

/// Sampling parameters for one kind of request.
struct Tuning {
    temperature: f32,
    max_tokens: u32,
}

const TITLE: Tuning = Tuning {
    temperature: 0.7,
    max_tokens: 50,
};
const TAGS: Tuning = Tuning {
    temperature: 0.5,
    max_tokens: 100,
};
const SUMMARY: Tuning = Tuning {
    temperature: 0.5,
    max_tokens: 400,
};
const MERGE: Tuning = Tuning {
    temperature: 0.3,
    max_tokens: 2000,
};

pub struct OpenAIAssist {
    client: Client,
    config: AssistConfig,
}

impl OpenAIAssist {
    pub fn new(config: AssistConfig) -> Result<Self, AssistError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AssistError::Config(format!("failed to create HTTP client: {e}")))?;

        info!(
            "initializing assist backend: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    async fn complete(
        &self,
        system: &str,
        prompt: String,
        tuning: &Tuning,
    ) -> Result<String, AssistError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature: Some(tuning.temperature),
            max_tokens: Some(tuning.max_tokens),
        };

        debug!(model = %self.config.model, "sending chat completion");

        let mut req = self.client.post(&url).json(&request);
        if let Some(ref api_key) = self.config.api_key {
            req = req.bearer_auth(api_key);
        }

        let response = req
            .send()
            .await
            .map_err(|e| AssistError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorResponse>()
                .await
                .map(|body| body.error.message)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(AssistError::Request(format!(
                "endpoint returned {status}: {message}"
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistError::Response(format!("failed to parse response: {e}")))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| AssistError::Response("no choices returned".to_string()))?;

        if content.is_empty() {
            return Err(AssistError::Response("empty completion".to_string()));
        }
        debug!(response_len = content.len(), "chat completion received");
        Ok(content)
    }
}

#[async_trait]
impl AssistService for OpenAIAssist {
    async fn generate_title(&self, content: &str) -> Result<String, AssistError> {
        if content.is_empty() {
            return Err(AssistError::EmptyInput("content"));
        }
        let prompt = format!(
            "Write a concise, descriptive title (at most 100 characters) for the content below. \
             Capture its main topic or key insight. Reply with the title only.\n\nContent:\n{}",
            truncate(content, TITLE_INPUT_CHARS)
        );

        let raw = self
            .complete("You write short titles for saved reading material.", prompt, &TITLE)
            .await?;
        let title = clean_title(&raw);
        if title.is_empty() {
            return Err(AssistError::Response("blank title".to_string()));
        }
        Ok(title)
    }

    async fn generate_tags(&self, content: &str) -> Result<Vec<String>, AssistError> {
        if content.is_empty() {
            return Err(AssistError::EmptyInput("content"));
        }
        let prompt = format!(
            "Suggest 3 to 5 tags for the content below. Each tag is a single word or short \
             phrase naming a topic, technology or concept. Reply with a JSON array of strings.\
             \n\nContent:\n{}",
            truncate(content, TAGS_INPUT_CHARS)
        );

        let raw = self
            .complete(
                "You label reading material with tags and always answer in JSON.",
                prompt,
                &TAGS,
            )
            .await?;
        let tags = parse_tags(&raw);
        if tags.is_empty() {
            return Err(AssistError::Response("no tags found in response".to_string()));
        }
        Ok(tags)
    }

    async fn summarize_content(&self, content: &str) -> Result<String, AssistError> {
        if content.is_empty() {
            return Err(AssistError::EmptyInput("content"));
        }
        let prompt = format!(
            "Summarize the content below in under 300 words, keeping its main points and \
             key insights.\n\nContent:\n{}",
            truncate(content, SUMMARY_INPUT_CHARS)
        );

        self.complete("You write concise summaries.", prompt, &SUMMARY)
            .await
    }

    async fn merge_contents(&self, contents: &[String]) -> Result<String, AssistError> {
        if contents.is_empty() {
            return Err(AssistError::EmptyInput("contents"));
        }
        let combined = contents.join(MERGE_SEPARATOR);
        let prompt = format!(
            "The pieces below cover related material. Merge them into one document: remove \
             repeated information, order the material logically, keep every unique insight \
             and make it read as a whole.\n\nPieces:\n{}",
            truncate(&combined, MERGE_INPUT_CHARS)
        );

        self.complete(
            "You merge related notes into one document without losing information.",
            prompt,
            &MERGE,
        )
        .await
    }
}
