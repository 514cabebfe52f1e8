//! Observability infrastructure
//!
//! Structured logging through `tracing`. Every crate emits events with
//! `tracing` macros; this module installs the process-wide subscriber.

mod logging;

pub use logging::{build_filter, init_tracing};
