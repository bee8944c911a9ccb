//! OpenAI-compatible assist backend.
//!
//! Works with any endpoint that speaks the chat completions API (OpenAI,
//! Ollama in compatibility mode, vLLM, LM Studio).

mod client;
pub mod text;
mod types;

use std::sync::Arc;

use shelf_books::{AssistError, AssistService};
use shelf_kernel::settings::AssistSettings;

pub use client::{AssistConfig, OpenAIAssist};

/// Build the assist backend if `settings` carry an API key.
pub fn from_settings(
    settings: &AssistSettings,
) -> Result<Option<Arc<dyn AssistService>>, AssistError> {
    if !settings.is_configured() {
        return Ok(None);
    }
    let backend = OpenAIAssist::new(AssistConfig::from(settings))?;
    Ok(Some(Arc::new(backend)))
}
