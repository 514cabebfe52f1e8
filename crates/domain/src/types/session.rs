//! Work session types
//!
//! `SessionSnapshot` is what the session service returns from its
//! start/pause/resume/current endpoints; `Session` is the locally cached copy
//! the timer works with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ArtworkId, NoteImage, SessionId};
use crate::impl_status_conversions;
use crate::utils::time::{deserialize_optional_timestamp, deserialize_timestamp};

/// Local timer status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Saving,
}

impl_status_conversions!(TimerStatus {
    Idle => "idle",
    Running => "running",
    Paused => "paused",
    Saving => "saving",
});

impl TimerStatus {
    /// A session exists for every status except `Idle`.
    pub fn has_session(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Authoritative session state reported by the session service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    #[serde(default)]
    pub current_total_seconds: u64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub is_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_id: Option<ArtworkId>,
}

/// Locally cached session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    pub artwork_id: ArtworkId,
    pub created_at: DateTime<Utc>,
    pub is_running: bool,
    pub current_total_seconds: u64,
}

impl Session {
    /// Cache a snapshot for the given artwork.
    pub fn from_snapshot(artwork_id: ArtworkId, snapshot: SessionSnapshot) -> Self {
        Self {
            session_id: snapshot.session_id,
            artwork_id,
            created_at: snapshot.created_at,
            is_running: snapshot.is_running,
            current_total_seconds: snapshot.current_total_seconds,
        }
    }

    /// Adopt the values the service returned at a pause/resume boundary.
    /// The artwork and session identity never change.
    pub fn reconcile(&mut self, snapshot: &SessionSnapshot) {
        self.is_running = snapshot.is_running;
        self.current_total_seconds = snapshot.current_total_seconds;
    }
}

/// Payload of the session service's stop call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSessionRequest {
    pub session_id: SessionId,
    /// Final duration in seconds after reconciliation.
    pub manual_duration: u64,
    pub content: String,
    pub image: Option<NoteImage>,
    /// Also publish `image` to the artwork's gallery.
    pub add_to_gallery: bool,
}

/// Summary of a session that was stopped and persisted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletedSession {
    pub session_id: SessionId,
    pub artwork_id: ArtworkId,
    pub created_at: DateTime<Utc>,
    pub duration_seconds: u64,
    pub had_image: bool,
    pub added_to_gallery: bool,
}

/// Past session as listed in an artwork's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_id: Option<ArtworkId>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}
