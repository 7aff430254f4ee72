//! Error types for ytqa.

use thiserror::Error;

/// Message shown to users when an upstream service fails.
pub const SERVICE_UNAVAILABLE: &str = "The service is currently unavailable. Please try again later.";

/// Library-level error type for ytqa operations.
#[derive(Error, Debug)]
pub enum YtqaError {
    #[error("Please provide a valid YouTube URL.")]
    MissingUrl,

    #[error("Please provide a valid YouTube URL.")]
    InvalidUrl(String),

    #[error("No transcript available. Please fetch the transcript first.")]
    NoTranscript,

    #[error("Please provide a valid question and ensure the transcript has been fetched.")]
    NotReady,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript service error: {0}")]
    TranscriptService(String),

    #[error("Text generation failed: {0}")]
    Llm(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

impl YtqaError {
    /// Whether this error is caused by user input rather than a failing service.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            YtqaError::MissingUrl
                | YtqaError::InvalidUrl(_)
                | YtqaError::NoTranscript
                | YtqaError::NotReady
        )
    }

    /// Text safe to show to an end user.
    ///
    /// Validation errors keep their wording; everything else collapses into
    /// [`SERVICE_UNAVAILABLE`] so upstream details stay in the logs.
    pub fn user_message(&self) -> String {
        if self.is_user_error() {
            self.to_string()
        } else {
            SERVICE_UNAVAILABLE.to_string()
        }
    }
}

/// Result type alias for ytqa operations.
pub type Result<T> = std::result::Result<T, YtqaError>;
