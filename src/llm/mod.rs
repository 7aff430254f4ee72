//! Text generation for summaries and answers.

mod completion;

pub use completion::CompletionGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for text generation backends.
///
/// Takes a fully rendered prompt, role delimiters included, and returns the
/// model's continuation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
