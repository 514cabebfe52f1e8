//! Remote adapters for the Atelier REST API
//!
//! - [`ApiClient`]: base URL handling, JSON/multipart requests and status
//!   mapping
//! - [`HttpSessionService`]: current/start/toggle/stop/discard/history
//! - [`HttpArtworkService`]: artwork details and gallery
//!
//! Requests are never retried here; the timer leaves its state untouched on
//! failure and the user repeats the action.

pub mod artworks;
pub mod client;
pub mod sessions;

pub use artworks::HttpArtworkService;
pub use client::ApiClient;
pub use sessions::HttpSessionService;
