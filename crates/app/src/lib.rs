//! # Atelier App
//!
//! Application layer - command facade for the UI shell.
//!
//! This crate contains:
//! - Commands (UI → backend bridge), each returning `Result<T, String>`
//! - Application context (dependency injection, one timer per artwork)
//! - Command logging helpers
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
