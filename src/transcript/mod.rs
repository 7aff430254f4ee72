//! Transcript segments and their normalized text form.

mod format;

pub use format::{normalize, NormalizedTranscript, SegmentOutcome};

use serde::{Deserialize, Serialize};

/// One timed caption entry as delivered by a transcript service.
///
/// Fields are optional because the service occasionally emits entries without
/// them; such entries are dropped during normalization instead of failing
/// the whole transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawSegment {
    /// Spoken text.
    #[serde(default)]
    pub text: Option<String>,
    /// Start time in seconds.
    #[serde(default)]
    pub start: Option<f64>,
    /// Duration in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

impl RawSegment {
    /// Create a complete segment.
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: Some(text.into()),
            start: Some(start),
            duration: Some(duration),
        }
    }
}
