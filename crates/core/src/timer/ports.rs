//! Port interfaces for the session timer
//!
//! These traits define the boundaries between the timer logic and the
//! infrastructure or UI that backs it.

use async_trait::async_trait;
use atelier_domain::{
    Artwork, NoteImage, Result, SessionRecord, SessionSnapshot, StopSessionRequest,
};
use chrono::{DateTime, Utc};

/// Remote, authoritative session resource
#[async_trait]
pub trait SessionService: Send + Sync {
    /// The user's active (running or paused) session, if any.
    async fn get_current(&self) -> Result<Option<SessionSnapshot>>;

    /// Start a session for an artwork.
    async fn start(&self, artwork_id: &str) -> Result<SessionSnapshot>;

    /// Pause the active session if running, resume it if paused.
    async fn toggle_pause(&self) -> Result<SessionSnapshot>;

    /// Persist the final duration and note, ending the session.
    async fn stop(&self, request: StopSessionRequest) -> Result<()>;

    /// Delete the active session without persisting anything.
    async fn discard(&self) -> Result<()>;

    /// Past sessions of an artwork.
    async fn get_history(&self, artwork_id: &str) -> Result<Vec<SessionRecord>>;
}

/// Artwork/gallery service
#[async_trait]
pub trait ArtworkService: Send + Sync {
    async fn get_artwork(&self, artwork_id: &str) -> Result<Artwork>;
}

/// Registry of local preview URLs for selected note images
pub trait PreviewStore: Send + Sync {
    /// Register an image and return the URL it can be previewed under.
    fn register(&self, image: &NoteImage) -> Result<String>;

    /// Release a URL returned by [`PreviewStore::register`]. Unknown URLs are
    /// ignored.
    fn revoke(&self, url: &str);
}

/// Wall-clock source
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// User acknowledgement for destructive actions
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Ask the user to confirm; `false` means the action must not happen.
    async fn confirm(&self, message: &str) -> bool;
}
