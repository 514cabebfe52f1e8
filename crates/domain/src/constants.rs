//! Application constants
//!
//! Centralized location for domain-level constants.

/// Interval of the local display ticker.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Capacity of the timer event channel; slow subscribers lag past this.
pub const TIMER_EVENT_CAPACITY: usize = 64;

/// Prefix of locally registered note-image preview URLs.
pub const PREVIEW_URL_SCHEME: &str = "blob:atelier/";

/// Format used to pre-fill the end-time input when a stop is requested.
pub const END_TIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Event names for UI subscribers
pub const EVENT_TIMER_STATE_CHANGED: &str = "timer-state-changed";
pub const EVENT_TIMER_TICK: &str = "timer-tick";
pub const EVENT_SESSION_COMPLETED: &str = "session-completed";
pub const EVENT_SESSION_DISCARDED: &str = "session-discarded";
