//! Session timer service - drives the state machine against the session port

use std::sync::Arc;
use std::time::Duration;

use atelier_domain::constants::{DEFAULT_TICK_INTERVAL_MS, TIMER_EVENT_CAPACITY};
use atelier_domain::{
    ArtworkId, AtelierError, CompletedSession, NoteImage, Result, SessionRecord, SessionSnapshot,
    TimerStatus,
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, instrument, warn};

use super::events::{TimerEvent, TimerSnapshot};
use super::ports::{Clock, ConfirmationPrompt, PreviewStore, SessionService, SystemClock};
use super::preview::PreviewHandle;
use super::state::TimerState;
use super::ticker::Ticker;

const DISCARD_PROMPT: &str =
    "Discard this session? All tracked time will be deleted and cannot be recovered.";

/// Result of a discard request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardOutcome {
    /// The session was deleted remotely and the timer is idle.
    Discarded,
    /// The user declined; nothing was sent and nothing changed.
    Declined,
}

/// Timer for one artwork's work session
///
/// Every user action takes the action lock for its whole duration, so a
/// second action cannot start while a remote call for the first is in
/// flight. The ticker runs only while the status is `Running` and is
/// replaced after every transition.
pub struct SessionTimer {
    artwork_id: ArtworkId,
    service: Arc<dyn SessionService>,
    previews: Arc<dyn PreviewStore>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<TimerState>>,
    ticker: Mutex<Option<Ticker>>,
    action_lock: Mutex<()>,
    restored: Mutex<bool>,
    events: broadcast::Sender<TimerEvent>,
    tick_interval: Duration,
}

impl SessionTimer {
    /// Create an idle timer for `artwork_id`
    pub fn new(
        artwork_id: impl Into<ArtworkId>,
        service: Arc<dyn SessionService>,
        previews: Arc<dyn PreviewStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(TIMER_EVENT_CAPACITY);
        Self {
            artwork_id: artwork_id.into(),
            service,
            previews,
            clock: Arc::new(SystemClock),
            state: Arc::new(Mutex::new(TimerState::new())),
            ticker: Mutex::new(None),
            action_lock: Mutex::new(()),
            restored: Mutex::new(false),
            events,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }

    /// Use a different wall-clock source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Change the local tick period. Each tick still counts as one second.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn artwork_id(&self) -> &str {
        &self.artwork_id
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Load the user's current session from the service and hydrate the
    /// timer from it.
    #[instrument(skip(self), fields(artwork_id = %self.artwork_id))]
    pub async fn bootstrap(&self) -> Result<TimerSnapshot> {
        let current = self.service.get_current().await?;
        self.hydrate(current).await
    }

    /// Bootstrap once, then return the hydrated snapshot.
    ///
    /// Concurrent callers wait for the first bootstrap instead of reading the
    /// idle placeholder. A failed bootstrap leaves the timer unrestored, so
    /// the next call fetches the current session again.
    pub async fn restore(&self) -> Result<TimerSnapshot> {
        let mut restored = self.restored.lock().await;
        if *restored {
            return Ok(self.snapshot().await);
        }
        let snapshot = self.bootstrap().await?;
        *restored = true;
        Ok(snapshot)
    }

    /// Hydrate an idle timer from an externally supplied current session.
    ///
    /// A session that belongs to another artwork leaves this timer idle.
    pub async fn hydrate(&self, current: Option<SessionSnapshot>) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;

        let current = current.filter(|snapshot| match snapshot.artwork_id.as_deref() {
            Some(other) if other != self.artwork_id => {
                info!(
                    session_id = %snapshot.session_id,
                    other_artwork_id = other,
                    "current session belongs to another artwork; staying idle"
                );
                false
            }
            _ => true,
        });

        let snapshot = {
            let mut state = self.state.lock().await;
            if state.status() != TimerStatus::Idle {
                return Err(AtelierError::InvalidState(format!(
                    "cannot hydrate while {}",
                    state.status()
                )));
            }
            *state = TimerState::from_snapshot(self.artwork_id.clone(), current)?;
            state.snapshot()
        };

        debug!(status = %snapshot.status, seconds = snapshot.seconds, "timer hydrated");
        self.after_transition(snapshot).await
    }

    /// Start a new session for this timer's artwork
    #[instrument(skip(self), fields(artwork_id = %self.artwork_id))]
    pub async fn start(&self) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;
        let pending = self.state.lock().await.prepare_start()?;

        let response = self.service.start(&self.artwork_id).await.inspect_err(|err| {
            warn!(error = %err, "start failed; timer stays idle");
        })?;

        let snapshot = {
            let mut state = self.state.lock().await;
            state.commit_start(pending, self.artwork_id.clone(), response)?;
            state.snapshot()
        };

        info!(session_id = ?snapshot.session_id, seconds = snapshot.seconds, "session started");
        self.after_transition(snapshot).await
    }

    /// Pause a running session or resume a paused one
    #[instrument(skip(self), fields(artwork_id = %self.artwork_id))]
    pub async fn toggle_pause(&self) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;
        let pending = self.state.lock().await.prepare_toggle_pause()?;
        let kind = pending.kind();

        let response = self.service.toggle_pause().await.inspect_err(|err| {
            warn!(error = %err, transition = ?kind, "toggle failed; timer unchanged");
        })?;

        if pending.session_id() != Some(response.session_id.as_str()) {
            warn!(
                expected = ?pending.session_id(),
                received = %response.session_id,
                "session service answered for a different session id"
            );
        }

        let snapshot = {
            let mut state = self.state.lock().await;
            state.commit_toggle_pause(pending, &response)?;
            state.snapshot()
        };

        info!(
            status = %snapshot.status,
            seconds = snapshot.seconds,
            transition = ?kind,
            "session reconciled"
        );
        self.after_transition(snapshot).await
    }

    /// Enter the save dialog with the end time pre-filled to now
    pub async fn request_stop(&self) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.request_stop(now)?;
            state.snapshot()
        };
        debug!(seconds = snapshot.seconds, "stop requested");
        self.after_transition(snapshot).await
    }

    /// Override the end time shown in the save dialog
    pub async fn edit_end_time(&self, value: impl Into<String>) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;
        let now = self.clock.now();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.edit_end_time(value, now)?;
            state.snapshot()
        };
        self.publish(TimerEvent::StateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Submit the reconciled duration and note, ending the session
    #[instrument(skip(self), fields(artwork_id = %self.artwork_id))]
    pub async fn confirm_save(&self) -> Result<CompletedSession> {
        let _action = self.action_lock.lock().await;
        let (pending, request) = self.state.lock().await.prepare_save()?;

        info!(
            session_id = %request.session_id,
            duration_seconds = request.manual_duration,
            has_image = request.image.is_some(),
            add_to_gallery = request.add_to_gallery,
            "submitting session"
        );

        self.service.stop(request.clone()).await.inspect_err(|err| {
            warn!(error = %err, "stop failed; session kept in saving state");
        })?;

        let (completed, snapshot) = {
            let mut state = self.state.lock().await;
            let completed = state.commit_save(pending, &request)?;
            (completed, state.snapshot())
        };

        self.after_transition(snapshot).await?;
        self.publish(TimerEvent::SessionCompleted(completed.clone()));
        Ok(completed)
    }

    /// Delete the session without persisting it, after user confirmation
    #[instrument(skip(self, prompt), fields(artwork_id = %self.artwork_id))]
    pub async fn discard(&self, prompt: &dyn ConfirmationPrompt) -> Result<DiscardOutcome> {
        let _action = self.action_lock.lock().await;
        let pending = self.state.lock().await.prepare_discard()?;

        if !prompt.confirm(DISCARD_PROMPT).await {
            debug!("discard declined");
            return Ok(DiscardOutcome::Declined);
        }

        self.service.discard().await.inspect_err(|err| {
            warn!(error = %err, "discard failed; timer unchanged");
        })?;

        let session_id = pending.session_id().map(str::to_string).unwrap_or_default();
        let snapshot = {
            let mut state = self.state.lock().await;
            state.commit_discard(pending)?;
            state.snapshot()
        };

        info!(session_id = %session_id, "session discarded");
        self.after_transition(snapshot).await?;
        self.publish(TimerEvent::SessionDiscarded { session_id });
        Ok(DiscardOutcome::Discarded)
    }

    pub async fn set_note_content(&self, content: impl Into<String>) -> Result<TimerSnapshot> {
        self.edit_note(|state| state.set_note_content(content)).await
    }

    /// Attach a photo to the note, replacing (and revoking) any previous one
    pub async fn select_note_image(&self, image: NoteImage) -> Result<TimerSnapshot> {
        let _action = self.action_lock.lock().await;
        let mut state = self.state.lock().await;
        if !state.status().has_session() {
            return Err(AtelierError::InvalidState(
                "cannot attach an image without an active session".into(),
            ));
        }
        let preview = PreviewHandle::create(self.previews.clone(), &image)?;
        state.select_note_image(image, preview)?;
        let snapshot = state.snapshot();
        drop(state);

        self.publish(TimerEvent::StateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    pub async fn clear_note_image(&self) -> Result<TimerSnapshot> {
        self.edit_note(TimerState::clear_note_image).await
    }

    pub async fn set_add_to_gallery(&self, enabled: bool) -> Result<TimerSnapshot> {
        self.edit_note(|state| state.set_add_to_gallery(enabled)).await
    }

    /// Past sessions of this timer's artwork
    pub async fn history(&self) -> Result<Vec<SessionRecord>> {
        self.service.get_history(&self.artwork_id).await
    }

    /// Tear the timer down: stop ticking and drop local state. The remote
    /// session is left as is and can be restored with [`Self::restore`].
    pub async fn shutdown(&self) {
        *self.restored.lock().await = false;
        let _action = self.action_lock.lock().await;
        self.stop_ticker().await;
        self.state.lock().await.reset();
        debug!(artwork_id = %self.artwork_id, "timer shut down");
    }

    async fn edit_note<F>(&self, edit: F) -> Result<TimerSnapshot>
    where
        F: FnOnce(&mut TimerState) -> Result<()>,
    {
        let _action = self.action_lock.lock().await;
        let snapshot = {
            let mut state = self.state.lock().await;
            edit(&mut *state)?;
            state.snapshot()
        };
        self.publish(TimerEvent::StateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    /// Replace the ticker for the new status and publish the change.
    async fn after_transition(&self, snapshot: TimerSnapshot) -> Result<TimerSnapshot> {
        self.stop_ticker().await;
        if snapshot.status == TimerStatus::Running {
            let ticker =
                Ticker::spawn(self.state.clone(), self.tick_interval, self.events.clone());
            *self.ticker.lock().await = Some(ticker);
        }
        self.publish(TimerEvent::StateChanged(snapshot.clone()));
        Ok(snapshot)
    }

    async fn stop_ticker(&self) {
        let previous = self.ticker.lock().await.take();
        if let Some(ticker) = previous {
            ticker.shutdown().await;
        }
    }

    fn publish(&self, event: TimerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTimer")
            .field("artwork_id", &self.artwork_id)
            .field("tick_interval", &self.tick_interval)
            .finish_non_exhaustive()
    }
}
