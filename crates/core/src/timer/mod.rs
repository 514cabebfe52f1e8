//! Work-session timer

pub mod events;
pub mod ports;
pub mod preview;
pub mod service;
pub mod state;
pub mod ticker;

pub use events::{TimerEvent, TimerSnapshot};
pub use preview::PreviewHandle;
pub use service::{DiscardOutcome, SessionTimer};
pub use state::{PendingTransition, TimerState, TransitionKind};
pub use ticker::Ticker;
