//! AI-assist port.

use async_trait::async_trait;

use crate::error::AssistError;

/// Input budgets, in characters, applied by implementations before a remote call.
pub const TITLE_INPUT_CHARS: usize = 3000;
pub const TAGS_INPUT_CHARS: usize = 3000;
pub const SUMMARY_INPUT_CHARS: usize = 4000;
pub const MERGE_INPUT_CHARS: usize = 6000;

/// Longest title an implementation may return.
pub const MAX_TITLE_CHARS: usize = 100;

/// Most tags an implementation may return.
pub const MAX_TAGS: usize = 5;

/// Stateless text enrichment backed by a remote model.
///
/// Implementations own prompt construction, truncation and response parsing.
/// Callers only ever see the cleaned value or an [`AssistError`].
#[async_trait]
pub trait AssistService: Send + Sync {
    /// A short descriptive title, at most [`MAX_TITLE_CHARS`] characters.
    async fn generate_title(&self, content: &str) -> Result<String, AssistError>;

    /// Between one and [`MAX_TAGS`] short tags.
    async fn generate_tags(&self, content: &str) -> Result<Vec<String>, AssistError>;

    /// A concise summary of `content`.
    async fn summarize_content(&self, content: &str) -> Result<String, AssistError>;

    /// One consolidated text with duplication removed.
    async fn merge_contents(&self, contents: &[String]) -> Result<String, AssistError>;
}
