//! Recursive character splitting.
//!
//! Text is cut at the coarsest separator present (paragraph, line, word,
//! then character). Pieces that fit are merged greedily into chunks; pieces
//! that do not are split again with the finer separators.

use super::ChunkingConfig;
use crate::error::Result;
use std::collections::VecDeque;
use tracing::debug;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into chunks of at most `chunk_size` characters.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    config: ChunkingConfig,
    separators: Vec<String>,
}

impl RecursiveSplitter {
    /// Create a splitter, failing if the overlap is not smaller than the chunk size.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Split text into chunks. Deterministic for a given text and config.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chunks = self.split_with(text, &self.separators);
        debug!(
            "Split {} characters into {} chunks",
            text.chars().count(),
            chunks.len()
        );
        chunks
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut finer: &[String] = &[];

        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.config.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }

        chunks
    }

    /// Greedily merge small pieces into chunks, carrying the tail of each
    /// chunk (at most `chunk_overlap` characters) into the next one.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let ChunkingConfig {
            chunk_size,
            chunk_overlap,
        } = self.config;

        let mut chunks = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > chunk_size && !current.is_empty() {
                if let Some(chunk) = join_trimmed(&current) {
                    chunks.push(chunk);
                }
                while total > chunk_overlap || (total + len > chunk_size && total > 0) {
                    let Some(dropped) = current.pop_front() else {
                        break;
                    };
                    total -= char_len(dropped);
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&current) {
            chunks.push(chunk);
        }

        chunks
    }
}

/// Split on `separator`, attaching it to the start of every piece after the
/// first. An empty separator splits into characters. Empty pieces are dropped.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|part| format!("{}{}", separator, part)));
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_trimmed(parts: &VecDeque<&str>) -> Option<String> {
    let joined: String = parts.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(size: usize, overlap: usize) -> RecursiveSplitter {
        RecursiveSplitter::new(ChunkingConfig::new(size, overlap)).unwrap()
    }

    fn sample_text() -> String {
        let mut text = String::new();
        for i in 0..300 {
            if i > 0 {
                text.push_str(if i % 50 == 0 {
                    "\n\n"
                } else if i % 10 == 0 {
                    "\n"
                } else {
                    " "
                });
            }
            text.push_str(&format!("w{}", i));
        }
        text
    }

    #[test]
    fn test_word_level_overlap() {
        let chunks = splitter(10, 5).split("aaaa bbbb cccc dddd");
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd"]);
    }

    #[test]
    fn test_character_level_exact_overlap() {
        let chunks = splitter(5, 2).split("abcdefghijklmnop");
        assert_eq!(chunks, vec!["abcde", "defgh", "ghijk", "jklmn", "mnop"]);

        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(3).collect();
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn test_prefers_paragraph_boundaries() {
        let chunks = splitter(20, 5).split("para one is here\n\npara two is here");
        assert_eq!(chunks, vec!["para one is here", "para two is here"]);
    }

    #[test]
    fn test_short_transcript_is_one_chunk() {
        let chunks = splitter(200, 20).split("Text: hello Start: 0.0\nText: world Start: 1.5\n");
        assert_eq!(chunks, vec!["Text: hello Start: 0.0\nText: world Start: 1.5"]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let chunks = splitter(6, 1).split("héllo wörld ñ");
        assert_eq!(chunks, vec!["héllo", "wörld", "ñ"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(splitter(10, 2).split("").is_empty());
        assert!(splitter(10, 2).split("   \n\n  ").is_empty());
    }

    #[test]
    fn test_chunks_cover_text_with_bounded_overlap() {
        let text = sample_text();
        let config = ChunkingConfig::new(60, 15);
        let chunks = RecursiveSplitter::new(config).unwrap().split(&text);

        assert!(chunks.len() > 10);

        let mut search_from = 0;
        let mut prev_end = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            assert!(chunk.chars().count() <= config.chunk_size, "chunk too long: {:?}", chunk);

            let start = text[search_from..]
                .find(chunk.as_str())
                .map(|offset| offset + search_from)
                .unwrap_or_else(|| panic!("chunk {} is not in order: {:?}", i, chunk));

            if start >= prev_end {
                // no overlap: only whitespace may sit between chunks
                assert!(text[prev_end..start].trim().is_empty());
            } else {
                assert!(prev_end - start <= config.chunk_overlap);
            }

            search_from = start + 1;
            prev_end = start + chunk.len();
        }

        assert_eq!(prev_end, text.trim_end().len());
    }

    #[test]
    fn test_consecutive_word_chunks_overlap() {
        let text = (0..100).map(|i| format!("word{:02}", i)).collect::<Vec<_>>().join(" ");
        let chunks = splitter(40, 10).split(&text);

        for pair in chunks.windows(2) {
            let last_word = pair[0].split(' ').last().unwrap();
            assert!(pair[1].starts_with(last_word), "{:?} -> {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = sample_text();
        let splitter = splitter(200, 20);
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn test_rejects_overlap_not_smaller_than_size() {
        assert!(RecursiveSplitter::new(ChunkingConfig::new(20, 20)).is_err());
        assert!(RecursiveSplitter::new(ChunkingConfig::new(20, 30)).is_err());
    }
}
