//! Pipeline orchestrator for ytqa.
//!
//! Coordinates fetch → normalize → (chunk → index → retrieve) → generate for
//! the two user actions, summarizing a video and answering a question about
//! it. All per-user state lives in the [`Session`] passed to each call.

use crate::chunking::{ChunkingConfig, RecursiveSplitter};
use crate::config::{FetchPolicy, Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, YtqaError};
use crate::llm::{CompletionGenerator, TextGenerator};
use crate::rag::{format_context_for_prompt, ContextChunk, RetrievalIndex};
use crate::session::{FetchedTranscript, Session};
use crate::transcript::normalize;
use crate::transcript_source::{get_transcript, video_id, TranscriptSource, YoutubeTranscriptClient};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// A generated answer with the retrieved chunks it was based on.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Chunks in the order they were placed in the prompt.
    pub context: Vec<ContextChunk>,
}

/// The main orchestrator for the ytqa pipeline.
pub struct Orchestrator {
    source: Arc<dyn TranscriptSource>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
    splitter: RecursiveSplitter,
    language: String,
    top_k: usize,
    summarize_policy: FetchPolicy,
    answer_policy: FetchPolicy,
}

impl Orchestrator {
    /// Create an orchestrator wired to YouTube and the configured model endpoints.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        let source = Arc::new(YoutubeTranscriptClient::new(Duration::from_secs(
            settings.youtube.timeout_secs,
        ))?);
        let embedder = Arc::new(OpenAIEmbedder::from_settings(settings)?);
        let generator = Arc::new(CompletionGenerator::from_settings(&settings.llm)?);

        info!(
            "Using completion model {} and embedding model {}",
            generator.model(),
            embedder.model()
        );

        Self::with_components(settings, prompts, source, embedder, generator)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: Prompts,
        source: Arc<dyn TranscriptSource>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            source,
            embedder,
            generator,
            prompts,
            splitter: RecursiveSplitter::new(ChunkingConfig::from(&settings.chunking))?,
            language: settings.youtube.language.clone(),
            top_k: settings.retrieval.k,
            summarize_policy: settings.session.summarize_policy,
            answer_policy: settings.session.answer_policy,
        })
    }

    /// Summarize the video at `video_url`.
    ///
    /// With the default `always` policy the transcript is fetched again on
    /// every call, replacing what the session held.
    #[instrument(skip(self, session))]
    pub async fn summarize(&self, session: &mut Session, video_url: Option<&str>) -> Result<String> {
        let url = non_blank(video_url).ok_or(YtqaError::MissingUrl)?;

        if self.summarize_policy == FetchPolicy::Always || !session.is_fetched() {
            self.fetch_into(session, url).await?;
        }

        let transcript = session.normalized_text().ok_or(YtqaError::NoTranscript)?;

        let prompt = self.prompts.summary_prompt(transcript);
        self.generator.generate(&prompt).await
    }

    /// Answer `question` about the session's video.
    ///
    /// With the default `reuse` policy a session that already holds a
    /// transcript is not refetched and `video_url` is ignored.
    pub async fn answer(
        &self,
        session: &mut Session,
        video_url: Option<&str>,
        question: Option<&str>,
    ) -> Result<String> {
        Ok(self.answer_with_context(session, video_url, question).await?.text)
    }

    /// Like [`answer`](Self::answer), also returning the chunks the prompt was built from.
    #[instrument(skip(self, session))]
    pub async fn answer_with_context(
        &self,
        session: &mut Session,
        video_url: Option<&str>,
        question: Option<&str>,
    ) -> Result<Answer> {
        if self.answer_policy == FetchPolicy::Always || !session.is_fetched() {
            let url = non_blank(video_url).ok_or(YtqaError::MissingUrl)?;
            self.fetch_into(session, url).await?;
        }

        let (Some(transcript), Some(question)) = (session.normalized_text(), non_blank(question)) else {
            return Err(YtqaError::NotReady);
        };

        let context = self.retrieve(transcript, question).await?;

        let prompt = self
            .prompts
            .qa_prompt(&format_context_for_prompt(&context), question);
        let text = self.generator.generate(&prompt).await?;

        Ok(Answer { text, context })
    }

    /// Chunk a transcript, index it and return the top-k chunks for `query`.
    #[instrument(skip(self, transcript))]
    pub async fn retrieve(&self, transcript: &str, query: &str) -> Result<Vec<ContextChunk>> {
        let chunks = self.splitter.split(transcript);
        info!("Indexing {} chunks", chunks.len());

        let index = RetrievalIndex::from_texts(&chunks, self.embedder.clone()).await?;
        index.similarity_search(query, self.top_k).await
    }

    /// Split a transcript with the configured chunk size and overlap.
    pub fn chunk(&self, transcript: &str) -> Vec<String> {
        self.splitter.split(transcript)
    }

    /// Fetch and normalize the transcript for `url`, overwriting the session.
    ///
    /// A video without a usable track stores an empty transcript. Errors leave
    /// the session untouched.
    pub async fn fetch_into(&self, session: &mut Session, url: &str) -> Result<()> {
        let video_id = video_id(url).ok_or_else(|| YtqaError::InvalidUrl(url.to_string()))?;

        let (track, segments) = match get_transcript(self.source.as_ref(), url, &self.language).await? {
            Some((track, segments)) => (Some(track), segments),
            None => (None, Vec::new()),
        };
        let normalized = normalize(&segments);

        if normalized.is_empty() {
            warn!("No usable transcript for {}", video_id);
        } else {
            info!(
                "Fetched transcript for {} ({} segments, {} characters)",
                video_id,
                normalized.segments,
                normalized.char_count()
            );
        }

        session.store(FetchedTranscript {
            video_id,
            track,
            segments,
            normalized,
            fetched_at: Utc::now(),
        });
        Ok(())
    }
}

/// Whitespace-only input counts as missing.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
