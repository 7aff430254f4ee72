//! Configuration settings for ytqa.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub session: SessionSettings,
    pub prompts: PromptSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// YouTube transcript service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Language code a transcript track must have to be selected.
    pub language: String,
    /// Timeout for requests to YouTube, in seconds.
    pub timeout_secs: u64,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Text generation settings.
///
/// The prompts use the Granite/Llama role delimiters, so the endpoint must
/// serve raw completions for a model trained on that format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of an OpenAI-compatible API. `None` means api.openai.com.
    pub api_base: Option<String>,
    /// Completion model.
    pub model: String,
    /// Maximum number of generated tokens.
    pub max_new_tokens: u32,
    /// Sampling temperature. Zero gives greedy decoding.
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: Some("http://localhost:11434/v1".to_string()),
            model: "granite3.2:8b".to_string(),
            max_new_tokens: 900,
            temperature: 0.0,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Base URL of an OpenAI-compatible API. Falls back to `llm.api_base`.
    pub api_base: Option<String>,
    /// Embedding model to use.
    pub model: String,
    /// Requested embedding dimensions, if the model supports truncation.
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            model: "granite-embedding:30m".to_string(),
            dimensions: None,
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            chunk_overlap: 20,
        }
    }
}

/// Retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of chunks handed to the answer prompt.
    pub k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { k: 7 }
    }
}

/// When an operation goes back to the transcript service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchPolicy {
    /// Fetch on every call, replacing whatever the session holds.
    #[default]
    Always,
    /// Reuse the session's transcript when it has one, ignoring the URL.
    Reuse,
}

/// Session caching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Fetch policy for summaries.
    pub summarize_policy: FetchPolicy,
    /// Fetch policy for answers.
    pub answer_policy: FetchPolicy,
    /// HTTP sessions unused for this long are dropped.
    pub idle_timeout_secs: u64,
    /// Upper bound on HTTP sessions; the least recently used is evicted.
    pub max_sessions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            summarize_policy: FetchPolicy::Always,
            answer_policy: FetchPolicy::Reuse,
            idle_timeout_secs: 3600,
            max_sessions: 1000,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory with `summary.toml` / `qa.toml` overriding the defaults.
    pub custom_dir: Option<String>,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::YtqaError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would only fail later, mid-request.
    pub fn validate(&self) -> crate::error::Result<()> {
        crate::chunking::ChunkingConfig::from(&self.chunking).validate()?;
        if self.retrieval.k == 0 {
            return Err(crate::error::YtqaError::Config(
                "retrieval.k must be at least 1".to_string(),
            ));
        }
        if self.session.max_sessions == 0 {
            return Err(crate::error::YtqaError::Config(
                "session.max_sessions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ytqa")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// API base for embeddings, falling back to the LLM endpoint.
    pub fn embedding_api_base(&self) -> Option<&str> {
        self.embedding
            .api_base
            .as_deref()
            .or(self.llm.api_base.as_deref())
    }
}
