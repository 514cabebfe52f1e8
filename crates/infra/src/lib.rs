//! # Atelier Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client and REST adapters for the session and artwork services
//! - In-memory preview store for note images
//! - Configuration loading (environment, JSON, TOML)
//! - `tracing` subscriber setup
//!
//! ## Architecture
//! - Implements traits defined in `atelier-core`
//! - Depends on `atelier-domain` and `atelier-core`
//! - Contains all "impure" code (network, filesystem, process-wide logging)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod preview;

// Re-export commonly used items
pub use api::{ApiClient, HttpArtworkService, HttpSessionService};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use preview::InMemoryPreviewStore;
