//! Flattening of timed segments into a single prompt-ready text.

use super::RawSegment;
use tracing::debug;

/// Result of formatting one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentOutcome {
    /// The formatted `Text: .. Start: ..` line, newline included.
    Line(String),
    /// The segment lacked text or a start time.
    Skipped,
}

impl RawSegment {
    /// Format this segment as a transcript line.
    pub fn format_line(&self) -> SegmentOutcome {
        match (&self.text, self.start) {
            // `{:?}` prints 0.0 as "0.0" rather than "0", which the prompts expect.
            (Some(text), Some(start)) => SegmentOutcome::Line(format!("Text: {} Start: {:?}\n", text, start)),
            _ => SegmentOutcome::Skipped,
        }
    }
}

/// A transcript flattened to one string with inline start times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTranscript {
    /// Concatenated segment lines.
    pub text: String,
    /// Number of segments that were readable.
    pub segments: usize,
    /// Number of segments dropped because a field was missing.
    pub skipped: usize,
}

impl NormalizedTranscript {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Normalize segments, in order, into `Text: <text> Start: <start>` lines.
pub fn normalize(segments: &[RawSegment]) -> NormalizedTranscript {
    let mut out = NormalizedTranscript::default();

    for segment in segments {
        match segment.format_line() {
            SegmentOutcome::Line(line) => {
                out.text.push_str(&line);
                out.segments += 1;
            }
            SegmentOutcome::Skipped => out.skipped += 1,
        }
    }

    if out.skipped > 0 {
        debug!("Skipped {} unreadable transcript segments", out.skipped);
    }

    out
}
