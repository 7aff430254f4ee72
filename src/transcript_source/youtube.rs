//! YouTube caption track client.
//!
//! Track listing and download go through `yt-transcript-rs`, which also
//! strips markup and decodes HTML entities in the caption text.

use super::{TrackInfo, TranscriptSource};
use crate::error::{Result, YtqaError};
use crate::transcript::RawSegment;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::FetchedTranscriptSnippet;

/// Transcript source backed by youtube.com.
pub struct YoutubeTranscriptClient {
    api: YouTubeTranscriptApi,
    timeout: Duration,
}

impl YoutubeTranscriptClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| YtqaError::TranscriptService(format!("Failed to create YouTube client: {}", e)))?;

        Ok(Self { api, timeout })
    }

    async fn with_timeout<T, E, F>(&self, what: &str, request: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(YtqaError::TranscriptService(format!("{} failed: {}", what, e))),
            Err(_) => Err(YtqaError::TranscriptService(format!(
                "{} timed out after {}s",
                what,
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscriptClient {
    #[instrument(skip(self))]
    async fn list(&self, video_id: &str) -> Result<Vec<TrackInfo>> {
        let list = self
            .with_timeout("Listing transcripts", self.api.list_transcripts(video_id))
            .await?;

        let tracks = list
            .transcripts()
            .map(|transcript| TrackInfo {
                language_code: transcript.language_code().to_string(),
                language: Some(transcript.language().to_string()),
                is_generated: transcript.is_generated(),
                handle: video_id.to_string(),
            })
            .collect();

        Ok(manual_first(tracks))
    }

    #[instrument(skip(self, track), fields(language = %track.language_code, generated = track.is_generated))]
    async fn fetch(&self, track: &TrackInfo) -> Result<Vec<RawSegment>> {
        let languages = [track.language_code.as_str()];
        let fetched = self
            .with_timeout(
                "Fetching transcript",
                self.api.fetch_transcript(&track.handle, &languages, false),
            )
            .await?;

        if fetched.is_generated != track.is_generated {
            warn!(
                "Requested {} track but received {}",
                kind(track.is_generated),
                kind(fetched.is_generated)
            );
        }

        let segments = to_segments(fetched.snippets);
        debug!("Fetched {} caption segments", segments.len());
        Ok(segments)
    }
}

/// Order tracks human-authored first, keeping the listed order within each kind.
///
/// The library keeps tracks in maps, so its order carries no meaning. The
/// library's own per-language lookup also prefers human-authored tracks, which
/// keeps the listed and fetched track in agreement.
fn manual_first(mut tracks: Vec<TrackInfo>) -> Vec<TrackInfo> {
    tracks.sort_by_key(|track| track.is_generated);
    tracks
}

fn to_segments(snippets: Vec<FetchedTranscriptSnippet>) -> Vec<RawSegment> {
    snippets
        .into_iter()
        .filter(|snippet| !snippet.text.is_empty())
        .map(|snippet| RawSegment::new(snippet.text, snippet.start, snippet.duration))
        .collect()
}

fn kind(generated: bool) -> &'static str {
    if generated {
        "generated"
    } else {
        "manual"
    }
}
