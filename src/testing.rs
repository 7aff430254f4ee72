//! In-memory stand-ins for the external services, used by unit tests.

use crate::embedding::Embedder;
use crate::error::{Result, YtqaError};
use crate::llm::TextGenerator;
use crate::transcript::RawSegment;
use crate::transcript_source::{TrackInfo, TranscriptSource};
use async_trait::async_trait;
use std::sync::Mutex;

/// Transcript source serving a fixed set of tracks for every video.
#[derive(Default)]
pub struct StubTranscriptSource {
    tracks: Vec<(TrackInfo, Vec<RawSegment>)>,
    listed: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl StubTranscriptSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, track: TrackInfo, segments: Vec<RawSegment>) -> Self {
        self.tracks.push((track, segments));
        self
    }

    pub fn listed_ids(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub fn fetched_handles(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.listed.lock().unwrap().len()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscriptSource for StubTranscriptSource {
    async fn list(&self, video_id: &str) -> Result<Vec<TrackInfo>> {
        self.listed.lock().unwrap().push(video_id.to_string());
        Ok(self.tracks.iter().map(|(track, _)| track.clone()).collect())
    }

    async fn fetch(&self, track: &TrackInfo) -> Result<Vec<RawSegment>> {
        self.fetched.lock().unwrap().push(track.handle.clone());
        self.tracks
            .iter()
            .find(|(t, _)| t.handle == track.handle)
            .map(|(_, segments)| segments.clone())
            .ok_or_else(|| YtqaError::TranscriptService(format!("unknown track {}", track.handle)))
    }
}

/// Transcript source whose every call fails.
pub struct FailingTranscriptSource;

#[async_trait]
impl TranscriptSource for FailingTranscriptSource {
    async fn list(&self, _video_id: &str) -> Result<Vec<TrackInfo>> {
        Err(YtqaError::TranscriptService("service unreachable".to_string()))
    }

    async fn fetch(&self, _track: &TrackInfo) -> Result<Vec<RawSegment>> {
        Err(YtqaError::TranscriptService("service unreachable".to_string()))
    }
}

/// Bag-of-words embedder over a fixed vocabulary, one dimension per word.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self {
            vocabulary: vec![
                "ownership", "borrowing", "rust", "pasta", "garlic", "cooking", "weather",
                "sunny", "segment", "question",
            ],
        }
    }
}

impl KeywordEmbedder {
    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.vocabulary
            .iter()
            .map(|term| words.iter().filter(|w| *w == term).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}

/// Embedder whose every call fails.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(YtqaError::Embedding("embedding endpoint down".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(YtqaError::Embedding("embedding endpoint down".to_string()))
    }
}

/// Generator returning a canned reply and recording every prompt.
pub struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Generator whose every call fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(YtqaError::Llm("model not loaded".to_string()))
    }
}
