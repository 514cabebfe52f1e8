//! Domain types and models

pub mod artwork;
pub mod note;
pub mod session;

pub use artwork::{Artwork, GalleryImage};
pub use note::{NoteForm, NoteImage};
pub use session::{
    CompletedSession, Session, SessionRecord, SessionSnapshot, StopSessionRequest, TimerStatus,
};

/// Identifier of an artwork, as issued by the artwork service.
pub type ArtworkId = String;

/// Identifier of a work session, as issued by the session service.
pub type SessionId = String;
