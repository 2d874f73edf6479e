//! Analysis collaborators — fetching a posting body and extracting a
//! structured analysis payload from it.
//!
//! Both capabilities are trait-shaped and carried in `AppState` as
//! `Arc<dyn …>`, so stage tests swap in canned implementations.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::pipeline::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};

/// Posting bodies are truncated to this many characters before prompting.
const ANALYSIS_INPUT_LIMIT: usize = 15_000;

/// Extracts a structured analysis payload from raw posting text. The
/// payload schema belongs to the collaborator; the core stores it opaquely
/// on `Job.analysis`.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, api_key: &str, document_text: &str) -> Result<Value, AppError>;
}

/// Fetches the body of a job posting URL.
#[async_trait]
pub trait PostingFetcher: Send + Sync {
    async fn fetch(&self, base_delay_ms: u64, url: &str) -> Result<String, AppError>;
}

pub struct AnthropicExtractor {
    llm: LlmClient,
}

impl AnthropicExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentExtractor for AnthropicExtractor {
    async fn extract(&self, api_key: &str, document_text: &str) -> Result<Value, AppError> {
        let excerpt = truncate_chars(document_text, ANALYSIS_INPUT_LIMIT);
        let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{content}", excerpt);
        self.llm
            .call_json::<Value>(api_key, &prompt, ANALYSIS_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Posting analysis failed: {e}")))
    }
}

pub struct HttpPostingFetcher {
    client: reqwest::Client,
}

impl HttpPostingFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpPostingFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostingFetcher for HttpPostingFetcher {
    /// Fetches the posting after a randomized politeness delay. The delay is
    /// best-effort courtesy toward the posting host, not a guarantee.
    async fn fetch(&self, base_delay_ms: u64, url: &str) -> Result<String, AppError> {
        let delay = politeness_delay(base_delay_ms);
        debug!("sleeping {}ms before fetching {url}", delay.as_millis());
        tokio::time::sleep(delay).await;

        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::USER_AGENT,
                "Mozilla/5.0 (compatible; AutoApply/1.0;)",
            )
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("posting fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!(
                "posting fetch returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::Fetch(format!("posting body unreadable: {e}")))
    }
}

/// Base delay plus a random jitter of up to the same amount.
fn politeness_delay(base_ms: u64) -> Duration {
    Duration::from_millis(base_ms + rand::thread_rng().gen_range(0..=base_ms))
}

/// Char-boundary-safe truncation.
fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
