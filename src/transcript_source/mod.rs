//! Transcript source abstraction for ytqa.
//!
//! A [`TranscriptSource`] lists the caption tracks of a video and fetches the
//! segments of one of them. Which track gets fetched is decided here, by
//! [`select_track`], so every source shares the same preference rules.

mod youtube;

pub use youtube::YoutubeTranscriptClient;

use crate::error::{Result, YtqaError};
use crate::transcript::RawSegment;
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, info, instrument};

static VIDEO_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})").expect("Invalid regex")
});

/// One caption track available for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// BCP-47-ish language code, e.g. `en`.
    pub language_code: String,
    /// Human readable language name, when the service provides one.
    pub language: Option<String>,
    /// Whether the track was produced by speech recognition.
    pub is_generated: bool,
    /// Source-specific handle used to fetch the track (the video ID for YouTube).
    pub handle: String,
}

impl TrackInfo {
    pub fn new(language_code: &str, is_generated: bool, handle: &str) -> Self {
        Self {
            language_code: language_code.to_string(),
            language: None,
            is_generated,
            handle: handle.to_string(),
        }
    }

    /// Language name with its code, e.g. `English (en)`, or just the code.
    pub fn display_language(&self) -> String {
        match &self.language {
            Some(name) => format!("{} ({})", name, self.language_code),
            None => self.language_code.clone(),
        }
    }
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List caption tracks for a video, in the order the service reports them.
    async fn list(&self, video_id: &str) -> Result<Vec<TrackInfo>>;

    /// Fetch the segments of one track.
    async fn fetch(&self, track: &TrackInfo) -> Result<Vec<RawSegment>>;
}

/// Extract the 11-character video ID from a `https://www.youtube.com/watch?v=` URL.
///
/// No other URL shapes are accepted; the pattern may appear anywhere in the input.
pub fn video_id(url: &str) -> Option<String> {
    VIDEO_URL_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pick the track to fetch.
///
/// Only tracks in `language` qualify. The first generated track is kept as a
/// fallback and later generated tracks never replace it; the first
/// human-authored track wins outright and ends the scan.
pub fn select_track(tracks: &[TrackInfo], language: &str) -> Option<usize> {
    let mut selected = None;

    for (index, track) in tracks.iter().enumerate() {
        if track.language_code != language {
            continue;
        }
        if track.is_generated {
            if selected.is_none() {
                selected = Some(index);
            }
        } else {
            selected = Some(index);
            break;
        }
    }

    selected
}

/// Fetch the best transcript for a video URL, along with the track it came from.
///
/// Returns `Ok(None)` when the video has no qualifying track.
#[instrument(skip(source))]
pub async fn get_transcript(
    source: &dyn TranscriptSource,
    url: &str,
    language: &str,
) -> Result<Option<(TrackInfo, Vec<RawSegment>)>> {
    let id = video_id(url).ok_or_else(|| YtqaError::InvalidUrl(url.to_string()))?;

    let mut tracks = source.list(&id).await?;
    debug!("Video {} has {} transcript tracks", id, tracks.len());

    let Some(index) = select_track(&tracks, language) else {
        info!("No '{}' transcript track for {}", language, id);
        return Ok(None);
    };

    let track = tracks.swap_remove(index);
    info!(
        "Fetching {} {} transcript for {}",
        if track.is_generated { "generated" } else { "manual" },
        track.display_language(),
        id
    );

    let segments = source.fetch(&track).await?;
    Ok(Some((track, segments)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTranscriptSource;

    fn track(lang: &str, generated: bool, handle: &str) -> TrackInfo {
        TrackInfo::new(lang, generated, handle)
    }

    #[test]
    fn test_video_id() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("see https://www.youtube.com/watch?v=a_b-c_d-e_f here"),
            Some("a_b-c_d-e_f".to_string())
        );
    }

    #[test]
    fn test_video_id_rejects_other_shapes() {
        assert_eq!(video_id("https://youtu.be/dQw4w9WgXcQ"), None);
        assert_eq!(video_id("http://www.youtube.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(video_id("https://youtube.com/watch?v=dQw4w9WgXcQ"), None);
        assert_eq!(video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(video_id("dQw4w9WgXcQ"), None);
        assert_eq!(video_id(""), None);
    }

    #[test]
    fn test_human_track_overrides_generated() {
        let tracks = vec![
            track("en", true, "gen-1"),
            track("en", true, "gen-2"),
            track("en", false, "human"),
        ];
        assert_eq!(select_track(&tracks, "en"), Some(2));
    }

    #[test]
    fn test_first_generated_track_is_kept() {
        let tracks = vec![track("en", true, "gen-1"), track("en", true, "gen-2")];
        assert_eq!(select_track(&tracks, "en"), Some(0));
    }

    #[test]
    fn test_first_human_track_stops_scan() {
        let tracks = vec![
            track("en", false, "human-1"),
            track("en", true, "gen"),
            track("en", false, "human-2"),
        ];
        assert_eq!(select_track(&tracks, "en"), Some(0));
    }

    #[test]
    fn test_other_languages_ignored() {
        let tracks = vec![
            track("de", false, "de"),
            track("en-GB", false, "en-gb"),
            track("en", true, "gen"),
        ];
        assert_eq!(select_track(&tracks, "en"), Some(2));
        assert_eq!(select_track(&tracks[..2], "en"), None);
        assert_eq!(select_track(&[], "en"), None);
    }

    #[tokio::test]
    async fn test_get_transcript_fetches_selected_track() {
        let source = StubTranscriptSource::new()
            .with_track(track("en", true, "gen"), vec![RawSegment::new("generated", 0.0, 1.0)])
            .with_track(track("en", false, "human"), vec![RawSegment::new("authored", 0.0, 1.0)]);

        let (track, segments) =
            get_transcript(&source, "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "en")
                .await
                .unwrap()
                .unwrap();

        assert_eq!(segments[0].text.as_deref(), Some("authored"));
        assert!(!track.is_generated);
        assert_eq!(source.fetched_handles(), vec!["human".to_string()]);
        assert_eq!(source.listed_ids(), vec!["dQw4w9WgXcQ".to_string()]);
    }

    #[tokio::test]
    async fn test_get_transcript_without_english_track() {
        let source = StubTranscriptSource::new()
            .with_track(track("fr", false, "fr"), vec![RawSegment::new("bonjour", 0.0, 1.0)]);

        let result = get_transcript(&source, "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "en")
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(source.fetched_handles().is_empty());
    }

    #[tokio::test]
    async fn test_get_transcript_invalid_url() {
        let source = StubTranscriptSource::new();
        let err = get_transcript(&source, "https://vimeo.com/123", "en").await.unwrap_err();

        assert!(matches!(err, YtqaError::InvalidUrl(_)));
        assert_eq!(source.list_calls(), 0);
    }

    #[test]
    fn test_display_language() {
        let mut track = track("en", true, "x");
        assert_eq!(track.display_language(), "en");

        track.language = Some("English (auto-generated)".to_string());
        assert_eq!(track.display_language(), "English (auto-generated) (en)");
    }
}
