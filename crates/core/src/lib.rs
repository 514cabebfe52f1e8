//! # Atelier Core
//!
//! Session timer business logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the session and artwork services
//! - The pure timer state machine and duration reconciliation
//! - The `SessionTimer` service that drives transitions against a port
//!
//! ## Architecture Principles
//! - Only depends on `atelier-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod timer;

pub use timer::ports::{
    ArtworkService, Clock, ConfirmationPrompt, PreviewStore, SessionService, SystemClock,
};
pub use timer::{
    DiscardOutcome, PendingTransition, PreviewHandle, SessionTimer, Ticker, TimerEvent,
    TimerSnapshot, TimerState, TransitionKind,
};
