//! Local one-second ticker
//!
//! A `Ticker` owns the only background task of the timer. It exists only
//! while the timer is running; dropping or shutting it down cancels the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::events::TimerEvent;
use super::state::TimerState;

/// Scoped handle to the tick task
#[derive(Debug)]
pub struct Ticker {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a task that ticks `state` every `period` until cancelled or
    /// until the state stops accepting ticks. The first tick fires one full
    /// period after spawning.
    pub fn spawn(
        state: Arc<Mutex<TimerState>>,
        period: Duration,
        events: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = token.cancelled() => {
                        debug!("ticker cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        let seconds = {
                            let mut guard = state.lock().await;
                            if !guard.tick() {
                                debug!(status = %guard.status(), "ticker stopped; timer no longer running");
                                break;
                            }
                            guard.seconds()
                        };
                        let _ = events.send(TimerEvent::Tick { seconds });
                    }
                }
            }
        });

        Self { cancel, handle: Some(handle) }
    }

    /// Cancel the task and wait for it to finish, so no tick can land after
    /// this returns.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    warn!(error = %err, "ticker task panicked");
                }
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
