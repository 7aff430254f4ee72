//! Pre-flight checks before talking to the model endpoints.
//!
//! Catches endpoint misconfiguration up front instead of after a transcript
//! has already been downloaded.

use crate::config::Settings;
use crate::error::{Result, YtqaError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Summaries need the completion endpoint.
    Summarize,
    /// Answers need both the completion and embedding endpoints.
    Ask,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Summarize => {
            check_endpoint("llm.api_base", settings.llm.api_base.as_deref())?;
        }
        Operation::Ask => {
            check_endpoint("llm.api_base", settings.llm.api_base.as_deref())?;
            check_endpoint("embedding.api_base", settings.embedding_api_base())?;
        }
    }
    Ok(())
}

/// A configured endpoint must be an http(s) URL; no endpoint means
/// api.openai.com, which needs a key.
fn check_endpoint(key: &str, api_base: Option<&str>) -> Result<()> {
    match api_base {
        Some(base) => {
            let url = url::Url::parse(base)
                .map_err(|e| YtqaError::Config(format!("{} is not a valid URL ({}): {}", key, base, e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(YtqaError::Config(format!(
                    "{} must be an http or https URL, got {}",
                    key, base
                )));
            }
            Ok(())
        }
        None => check_api_key(),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(YtqaError::Config(
            "OPENAI_API_KEY is empty. Set it, or point llm.api_base at a local server.".to_string(),
        )),
        Err(_) => Err(YtqaError::Config(
            "OPENAI_API_KEY not set. Set it, or point llm.api_base at a local server.".to_string(),
        )),
    }
}
