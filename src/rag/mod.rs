//! Retrieval over transcript chunks for question answering.

mod index;

pub use index::RetrievalIndex;

use crate::vector_store::SearchResult;

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone)]
pub struct ContextChunk {
    /// Chunk text.
    pub content: String,
    /// Position of the chunk in the transcript.
    pub order: usize,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            content: result.document.content,
            order: result.document.chunk_order,
            score: result.score,
        }
    }
}

/// Format retrieved chunks for the `{{context}}` slot of the answer prompt.
///
/// Chunks stay in relevance order, separated by blank lines.
pub fn format_context_for_prompt(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_context_for_prompt() {
        let chunks = vec![
            ContextChunk {
                content: "Text: b Start: 2.0".to_string(),
                order: 1,
                score: 0.9,
            },
            ContextChunk {
                content: "Text: a Start: 1.0".to_string(),
                order: 0,
                score: 0.5,
            },
        ];

        assert_eq!(
            format_context_for_prompt(&chunks),
            "Text: b Start: 2.0\n\nText: a Start: 1.0"
        );
        assert_eq!(format_context_for_prompt(&[]), "");
    }
}
