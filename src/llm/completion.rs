//! Raw completions against an OpenAI-compatible endpoint.

use super::TextGenerator;
use crate::config::LlmSettings;
use crate::error::{Result, YtqaError};
use crate::openai::create_client;
use async_openai::types::CreateCompletionRequestArgs;
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Generator calling the `/completions` endpoint.
///
/// The chat endpoint would wrap the prompt in the server's own template, so
/// the prompt is sent verbatim as a completion instead.
pub struct CompletionGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl CompletionGenerator {
    /// Create a generator from LLM settings.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings.api_base.as_deref())?,
            model: settings.model.clone(),
            max_tokens: settings.max_new_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for CompletionGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = CreateCompletionRequestArgs::default()
            .model(&self.model)
            .prompt(prompt)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| YtqaError::Llm(format!("Failed to build request: {}", e)))?;

        let response = self.client.completions().create(request).await.map_err(|e| {
            YtqaError::OpenAI(format!("Completion API error: {}", e))
        })?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| YtqaError::Llm("Empty response from LLM".to_string()))?;

        debug!("Generated {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_uses_greedy_defaults() {
        let generator = CompletionGenerator::from_settings(&LlmSettings::default()).unwrap();
        assert_eq!(generator.model(), "granite3.2:8b");
        assert_eq!(generator.max_tokens, 900);
        assert_eq!(generator.temperature, 0.0);
    }
}
