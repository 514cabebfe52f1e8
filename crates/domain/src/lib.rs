//! # Atelier Domain
//!
//! Business domain types for the Atelier session timer.
//!
//! This crate contains:
//! - Session, note and artwork data types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Timestamp parsing shared by wire types and the timer
//!
//! ## Architecture
//! - No dependencies on other Atelier crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::time::{format_timestamp, parse_timestamp};
