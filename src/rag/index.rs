//! Similarity index built from a transcript's chunks.

use super::ContextChunk;
use crate::embedding::Embedder;
use crate::error::{Result, YtqaError};
use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Embeds chunks once and answers top-k similarity queries against them.
pub struct RetrievalIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl RetrievalIndex {
    /// Embed `chunks` into a fresh in-memory store.
    pub async fn from_texts(chunks: &[String], embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::from_texts_in(chunks, embedder, Arc::new(MemoryVectorStore::new())).await
    }

    /// Embed `chunks` into the given store.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    async fn from_texts_in(
        chunks: &[String],
        embedder: Arc<dyn Embedder>,
        store: Arc<dyn VectorStore>,
    ) -> Result<Self> {
        let embeddings = embedder.embed_batch(chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(YtqaError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let documents: Vec<Document> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(order, (content, embedding))| Document::new(content.clone(), order, embedding))
            .collect();

        let indexed = store.upsert_batch(&documents).await?;
        debug!("Indexed {} chunks", indexed);

        Ok(Self { store, embedder })
    }

    /// Return the `k` chunks most similar to `query`, best first.
    #[instrument(skip(self))]
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<ContextChunk>> {
        let query_embedding = self.embedder.embed(query).await?;
        let results = self.store.search(&query_embedding, k).await?;
        Ok(results.into_iter().map(ContextChunk::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingEmbedder, KeywordEmbedder};

    fn chunks() -> Vec<String> {
        vec![
            "Text: the weather is sunny today Start: 0.0".to_string(),
            "Text: rust ownership and borrowing Start: 4.0".to_string(),
            "Text: cooking pasta with garlic Start: 8.0".to_string(),
            "Text: the borrow checker enforces ownership Start: 12.0".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_similarity_search_ranks_relevant_chunks() {
        let index = RetrievalIndex::from_texts(&chunks(), Arc::new(KeywordEmbedder::default()))
            .await
            .unwrap();

        let results = index.similarity_search("ownership borrowing", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].order, 1);
        assert_eq!(results[1].order, 3);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_similarity_search_caps_at_available_chunks() {
        let index = RetrievalIndex::from_texts(&chunks(), Arc::new(KeywordEmbedder::default()))
            .await
            .unwrap();

        let results = index.similarity_search("pasta", 7).await.unwrap();
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].order, 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let result = RetrievalIndex::from_texts(&chunks(), Arc::new(FailingEmbedder)).await;
        assert!(matches!(result, Err(YtqaError::Embedding(_))));
    }
}
