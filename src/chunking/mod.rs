//! Splitting of normalized transcripts into overlapping chunks for embedding.

mod recursive;

pub use recursive::RecursiveSplitter;

use crate::config::ChunkingSettings;
use crate::error::{Result, YtqaError};
use serde::{Deserialize, Serialize};

/// Configuration for chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk into the next.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 200,
            chunk_overlap: 20,
        }
    }
}

impl From<&ChunkingSettings> for ChunkingConfig {
    fn from(settings: &ChunkingSettings) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            chunk_overlap: settings.chunk_overlap,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// The overlap must be strictly smaller than the chunk size.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(YtqaError::Config("chunk_size must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(YtqaError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(ChunkingConfig::default().validate().is_ok());
        assert!(ChunkingConfig::new(10, 9).validate().is_ok());
        assert!(ChunkingConfig::new(10, 10).validate().is_err());
        assert!(ChunkingConfig::new(10, 25).validate().is_err());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
    }

    #[test]
    fn test_splitter_rejects_bad_overlap() {
        let result = RecursiveSplitter::new(ChunkingConfig::new(20, 20));
        assert!(matches!(result, Err(YtqaError::Config(_))));
    }
}
