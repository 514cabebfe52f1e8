//! Timer events and the read-only view handed to UI subscribers

use atelier_domain::constants::{
    EVENT_SESSION_COMPLETED, EVENT_SESSION_DISCARDED, EVENT_TIMER_STATE_CHANGED, EVENT_TIMER_TICK,
};
use atelier_domain::{ArtworkId, CompletedSession, SessionId, TimerStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of the timer
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub status: TimerStatus,
    pub session_id: Option<SessionId>,
    pub artwork_id: Option<ArtworkId>,
    pub created_at: Option<DateTime<Utc>>,
    pub seconds: u64,
    pub end_time_input: Option<String>,
    pub is_time_edited: bool,
    pub note_content: String,
    pub note_image_name: Option<String>,
    pub preview_url: Option<String>,
    pub add_to_gallery: bool,
}

/// Notifications published by [`super::SessionTimer`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    Tick { seconds: u64 },
    SessionCompleted(CompletedSession),
    SessionDiscarded { session_id: SessionId },
}

impl TimerEvent {
    /// Channel name a UI shell would emit this event under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::StateChanged(_) => EVENT_TIMER_STATE_CHANGED,
            Self::Tick { .. } => EVENT_TIMER_TICK,
            Self::SessionCompleted(_) => EVENT_SESSION_COMPLETED,
            Self::SessionDiscarded { .. } => EVENT_SESSION_DISCARDED,
        }
    }
}
