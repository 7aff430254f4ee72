//! Per-conversation transcript state.
//!
//! A [`Session`] holds the last transcript fetched on behalf of one user.
//! The orchestrator takes it by `&mut`, so a session is only ever used by one
//! request at a time; [`SessionRegistry`] hands out independently locked
//! sessions to concurrent HTTP clients.

use crate::config::SessionSettings;
use crate::transcript::{NormalizedTranscript, RawSegment};
use crate::transcript_source::TrackInfo;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// A transcript held by a session.
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    /// Video the transcript belongs to.
    pub video_id: String,
    /// Track the segments came from, if the video had a usable one.
    pub track: Option<TrackInfo>,
    /// Segments as delivered by the transcript service.
    pub segments: Vec<RawSegment>,
    /// Normalized text handed to the prompts.
    pub normalized: NormalizedTranscript,
    /// When the transcript was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Transcript cache for one conversation.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Option<FetchedTranscript>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the session holds a non-empty transcript.
    pub fn is_fetched(&self) -> bool {
        self.transcript
            .as_ref()
            .is_some_and(|t| !t.normalized.is_empty())
    }

    /// The normalized transcript text, if any.
    pub fn normalized_text(&self) -> Option<&str> {
        self.transcript
            .as_ref()
            .map(|t| t.normalized.text.as_str())
            .filter(|text| !text.is_empty())
    }

    pub fn transcript(&self) -> Option<&FetchedTranscript> {
        self.transcript.as_ref()
    }

    /// Replace the held transcript, even with an empty one.
    pub fn store(&mut self, transcript: FetchedTranscript) {
        self.transcript = Some(transcript);
    }

    pub fn clear(&mut self) {
        self.transcript = None;
    }

    /// Snapshot for status reporting.
    pub fn status(&self) -> SessionStatus {
        match &self.transcript {
            Some(t) => SessionStatus {
                fetched: !t.normalized.is_empty(),
                video_id: Some(t.video_id.clone()),
                language: t.track.as_ref().map(TrackInfo::display_language),
                generated: t.track.as_ref().map(|track| track.is_generated),
                fetched_at: Some(t.fetched_at),
                segments: t.normalized.segments,
                skipped_segments: t.normalized.skipped,
                characters: t.normalized.char_count(),
            },
            None => SessionStatus::default(),
        }
    }
}

/// Serializable summary of a session.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SessionStatus {
    pub fetched: bool,
    pub video_id: Option<String>,
    pub language: Option<String>,
    pub generated: Option<bool>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub segments: usize,
    pub skipped_segments: usize,
    pub characters: usize,
}

/// Shared handle to a session.
pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_used: Instant,
}

/// Sessions keyed by ID, plus a default session for clients that send none.
///
/// Named sessions expire after `idle_timeout` without use, and the least
/// recently used one is evicted once `max_sessions` is reached.
pub struct SessionRegistry {
    default: SharedSession,
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::from_settings(&SessionSettings::default())
    }
}

impl SessionRegistry {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::with_limits(
            Duration::from_secs(settings.idle_timeout_secs),
            settings.max_sessions,
        )
    }

    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            default: SharedSession::default(),
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Create a new empty session and return its ID.
    pub fn create(&self) -> Uuid {
        self.create_at(Instant::now())
    }

    fn create_at(&self, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());

        Self::sweep(&mut sessions, now, self.idle_timeout);
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| *id)
            else {
                break;
            };
            debug!("Evicting least recently used session {}", oldest);
            sessions.remove(&oldest);
        }

        sessions.insert(
            id,
            Entry {
                session: SharedSession::default(),
                last_used: now,
            },
        );
        id
    }

    /// Look up a session, marking it as used. `None` selects the default session.
    pub fn get(&self, id: Option<Uuid>) -> Option<SharedSession> {
        self.get_at(id, Instant::now())
    }

    fn get_at(&self, id: Option<Uuid>, now: Instant) -> Option<SharedSession> {
        let Some(id) = id else {
            return Some(self.default.clone());
        };

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let entry = sessions.get_mut(&id)?;
        if now.saturating_duration_since(entry.last_used) > self.idle_timeout {
            sessions.remove(&id);
            return None;
        }
        entry.last_used = now;
        Some(entry.session.clone())
    }

    /// Remove a session. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some()
    }

    /// Drop sessions idle for longer than the timeout. Returns how many were dropped.
    pub fn remove_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        Self::sweep(&mut sessions, Instant::now(), self.idle_timeout)
    }

    fn sweep(sessions: &mut HashMap<Uuid, Entry>, now: Instant, idle_timeout: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.last_used) <= idle_timeout);
        before - sessions.len()
    }

    /// Number of named sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::normalize;

    fn fetched(video_id: &str, segments: Vec<RawSegment>) -> FetchedTranscript {
        FetchedTranscript {
            video_id: video_id.to_string(),
            track: Some(TrackInfo::new("en", false, video_id)),
            normalized: normalize(&segments),
            segments,
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert!(!session.is_fetched());
        assert_eq!(session.status(), SessionStatus::default());

        session.store(fetched("abc", vec![RawSegment::new("hi", 0.0, 1.0)]));
        assert!(session.is_fetched());
        assert_eq!(session.normalized_text(), Some("Text: hi Start: 0.0\n"));
        assert_eq!(session.status().segments, 1);
        assert_eq!(session.status().language.as_deref(), Some("en"));
        assert_eq!(session.status().generated, Some(false));

        session.store(fetched("def", vec![]));
        assert!(!session.is_fetched());
        assert_eq!(session.normalized_text(), None);
        assert_eq!(session.status().video_id.as_deref(), Some("def"));

        session.clear();
        assert!(session.transcript().is_none());
    }

    #[tokio::test]
    async fn test_registry_isolates_sessions() {
        let registry = SessionRegistry::default();
        let a = registry.create();
        let b = registry.create();
        assert_eq!(registry.len(), 2);

        registry
            .get(Some(a))
            .unwrap()
            .lock()
            .await
            .store(fetched("a", vec![RawSegment::new("x", 0.0, 1.0)]));

        assert!(registry.get(Some(a)).unwrap().lock().await.is_fetched());
        assert!(!registry.get(Some(b)).unwrap().lock().await.is_fetched());
        assert!(!registry.get(None).unwrap().lock().await.is_fetched());

        assert!(registry.remove(a));
        assert!(!registry.remove(a));
        assert!(registry.get(Some(a)).is_none());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let registry = SessionRegistry::with_limits(Duration::from_secs(60), 100);
        let start = Instant::now();
        let stale = registry.create_at(start);
        let fresh = registry.create_at(start);

        assert!(registry.get_at(Some(fresh), start + Duration::from_secs(50)).is_some());

        // Creating a session sweeps everything idle past the timeout.
        registry.create_at(start + Duration::from_secs(90));
        assert_eq!(registry.len(), 2);
        assert!(registry.get_at(Some(stale), start + Duration::from_secs(90)).is_none());
        assert!(registry.get_at(Some(fresh), start + Duration::from_secs(90)).is_some());

        // A lookup after the timeout drops the session.
        assert!(registry.get_at(Some(fresh), start + Duration::from_secs(200)).is_none());
        assert_eq!(registry.len(), 1);

        // The default session never expires.
        assert!(registry.get_at(None, start + Duration::from_secs(10_000)).is_some());
    }

    #[test]
    fn test_registry_is_bounded() {
        let registry = SessionRegistry::with_limits(Duration::from_secs(3600), 100);
        let start = Instant::now();

        let first = registry.create_at(start);
        for i in 1..10_000u64 {
            registry.create_at(start + Duration::from_millis(i));
        }

        assert_eq!(registry.len(), 100);
        assert!(registry.get_at(Some(first), start + Duration::from_secs(11)).is_none());
    }

    #[test]
    fn test_eviction_prefers_least_recently_used() {
        let registry = SessionRegistry::with_limits(Duration::from_secs(3600), 2);
        let start = Instant::now();
        let a = registry.create_at(start);
        let b = registry.create_at(start + Duration::from_secs(1));

        // Touching `a` makes `b` the oldest.
        registry.get_at(Some(a), start + Duration::from_secs(2));
        registry.create_at(start + Duration::from_secs(3));

        assert!(registry.get_at(Some(a), start + Duration::from_secs(4)).is_some());
        assert!(registry.get_at(Some(b), start + Duration::from_secs(4)).is_none());
    }
}
