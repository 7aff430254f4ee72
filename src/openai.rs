//! OpenAI-compatible client configuration with sensible defaults.

use crate::error::{Result, YtqaError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for completion and embedding requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a client for an OpenAI-compatible endpoint.
///
/// `api_base` of `None` targets api.openai.com. The key is read from
/// `OPENAI_API_KEY`; local servers such as Ollama accept any value.
pub fn create_client(api_base: Option<&str>) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| YtqaError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = api_base {
        config = config.with_api_base(base.trim_end_matches('/'));
    }
    if std::env::var("OPENAI_API_KEY").map(|k| k.is_empty()).unwrap_or(true) {
        // async-openai sends an empty bearer token otherwise, which some proxies reject
        config = config.with_api_key("unused");
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
