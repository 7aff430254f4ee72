//! Configuration module for ytqa.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompt, SummaryPrompt};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, FetchPolicy, GeneralSettings, LlmSettings,
    PromptSettings, RetrievalSettings, ServerSettings, SessionSettings, Settings,
    YoutubeSettings,
};
