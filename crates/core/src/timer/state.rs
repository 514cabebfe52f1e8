//! Timer state machine
//!
//! `TimerState` is pure: it never talks to the session service. Remote-backed
//! transitions are two-phase. `prepare_*` checks the event is legal from the
//! current status and returns a [`PendingTransition`]; the caller performs the
//! remote call and then passes the pending value and the response to the
//! matching `commit_*`. A failed call simply drops the pending value, which
//! leaves the state exactly as it was.
//!
//! ```text
//! Idle --start--> Running <--toggle--> Paused
//!                    |                   |
//!                    +--request_stop-----+--> Saving --confirm_save--> Idle
//! Running | Paused | Saving --discard--> Idle
//! ```

use atelier_domain::{
    format_timestamp, parse_timestamp, AtelierError, ArtworkId, CompletedSession, NoteForm,
    NoteImage, Result, Session, SessionId, SessionSnapshot, StopSessionRequest, TimerStatus,
};
use chrono::{DateTime, Utc};

use super::events::TimerSnapshot;
use super::preview::PreviewHandle;

/// Remote-backed transition kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Start,
    Pause,
    Resume,
    Save,
    Discard,
}

impl TransitionKind {
    /// Status the timer is in once the transition commits.
    pub fn target(self) -> TimerStatus {
        match self {
            Self::Start | Self::Resume => TimerStatus::Running,
            Self::Pause => TimerStatus::Paused,
            Self::Save | Self::Discard => TimerStatus::Idle,
        }
    }
}

/// A validated transition waiting on its remote call
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending transition does nothing until committed"]
pub struct PendingTransition {
    kind: TransitionKind,
    from: TimerStatus,
    session_id: Option<SessionId>,
}

impl PendingTransition {
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn from_status(&self) -> TimerStatus {
        self.from
    }

    pub fn to_status(&self) -> TimerStatus {
        self.kind.target()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

/// Local timer state
#[derive(Debug, Default)]
pub struct TimerState {
    status: TimerStatus,
    session: Option<Session>,
    seconds: u64,
    end_time_input: Option<String>,
    is_time_edited: bool,
    note: NoteForm,
    preview: Option<PreviewHandle>,
    add_to_gallery: bool,
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the state from the service's current session, e.g. after a
    /// page reload. `None` yields an idle timer; a snapshot without a session
    /// id is rejected.
    pub fn from_snapshot(
        artwork_id: ArtworkId,
        snapshot: Option<SessionSnapshot>,
    ) -> Result<Self> {
        let Some(snapshot) = snapshot else {
            return Ok(Self::default());
        };
        if snapshot.session_id.trim().is_empty() {
            return Err(AtelierError::Remote("session service returned an empty session id".into()));
        }

        let status = if snapshot.is_running { TimerStatus::Running } else { TimerStatus::Paused };
        let seconds = snapshot.current_total_seconds;
        Ok(Self {
            status,
            session: Some(Session::from_snapshot(artwork_id, snapshot)),
            seconds,
            ..Self::default()
        })
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn end_time_input(&self) -> Option<&str> {
        self.end_time_input.as_deref()
    }

    pub fn is_time_edited(&self) -> bool {
        self.is_time_edited
    }

    pub fn note(&self) -> &NoteForm {
        &self.note
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    pub fn add_to_gallery(&self) -> bool {
        self.add_to_gallery
    }

    /// Advance the local counter by one second. Only counts while running;
    /// returns whether the tick was applied.
    pub fn tick(&mut self) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        self.seconds = self.seconds.saturating_add(1);
        true
    }

    // ------------------------------------------------------------------
    // Remote-backed transitions
    // ------------------------------------------------------------------

    pub fn prepare_start(&self) -> Result<PendingTransition> {
        self.expect_status(&[TimerStatus::Idle], "start")?;
        Ok(PendingTransition { kind: TransitionKind::Start, from: self.status, session_id: None })
    }

    pub fn commit_start(
        &mut self,
        pending: PendingTransition,
        artwork_id: ArtworkId,
        snapshot: SessionSnapshot,
    ) -> Result<()> {
        self.expect_pending(&pending, TransitionKind::Start)?;
        *self = Self::from_snapshot(artwork_id, Some(snapshot))?;
        Ok(())
    }

    pub fn prepare_toggle_pause(&self) -> Result<PendingTransition> {
        let kind = match self.status {
            TimerStatus::Running => TransitionKind::Pause,
            TimerStatus::Paused => TransitionKind::Resume,
            other => {
                return Err(AtelierError::InvalidState(format!(
                    "cannot pause or resume while {other}"
                )))
            }
        };
        Ok(PendingTransition { kind, from: self.status, session_id: self.session_id() })
    }

    /// Adopt the service's totals and running flag. The resulting status
    /// follows the service, not the requested direction.
    pub fn commit_toggle_pause(
        &mut self,
        pending: PendingTransition,
        snapshot: &SessionSnapshot,
    ) -> Result<()> {
        if !matches!(pending.kind, TransitionKind::Pause | TransitionKind::Resume) {
            return Err(mismatched(&pending, "toggle_pause"));
        }
        self.expect_from(&pending)?;

        let session = self.session.as_mut().ok_or_else(missing_session)?;
        session.reconcile(snapshot);
        self.seconds = snapshot.current_total_seconds;
        self.status =
            if snapshot.is_running { TimerStatus::Running } else { TimerStatus::Paused };
        Ok(())
    }

    /// Build the stop payload for the current note and reconciled duration.
    pub fn prepare_save(&self) -> Result<(PendingTransition, StopSessionRequest)> {
        self.expect_status(&[TimerStatus::Saving], "save")?;
        let session = self.session.as_ref().ok_or_else(missing_session)?;

        let request = StopSessionRequest {
            session_id: session.session_id.clone(),
            manual_duration: self.final_duration(),
            content: self.note.content.clone(),
            image: self.note.image.clone(),
            add_to_gallery: self.add_to_gallery && self.note.image.is_some(),
        };
        let pending = PendingTransition {
            kind: TransitionKind::Save,
            from: self.status,
            session_id: Some(session.session_id.clone()),
        };
        Ok((pending, request))
    }

    pub fn commit_save(
        &mut self,
        pending: PendingTransition,
        request: &StopSessionRequest,
    ) -> Result<CompletedSession> {
        self.expect_pending(&pending, TransitionKind::Save)?;
        let session = self.session.as_ref().ok_or_else(missing_session)?;

        let completed = CompletedSession {
            session_id: session.session_id.clone(),
            artwork_id: session.artwork_id.clone(),
            created_at: session.created_at,
            duration_seconds: request.manual_duration,
            had_image: request.image.is_some(),
            added_to_gallery: request.add_to_gallery,
        };
        self.reset();
        Ok(completed)
    }

    pub fn prepare_discard(&self) -> Result<PendingTransition> {
        self.expect_status(
            &[TimerStatus::Running, TimerStatus::Paused, TimerStatus::Saving],
            "discard",
        )?;
        Ok(PendingTransition {
            kind: TransitionKind::Discard,
            from: self.status,
            session_id: self.session_id(),
        })
    }

    pub fn commit_discard(&mut self, pending: PendingTransition) -> Result<()> {
        self.expect_pending(&pending, TransitionKind::Discard)?;
        self.reset();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Local transitions
    // ------------------------------------------------------------------

    /// Enter `Saving`, pre-filling the end time with `now`.
    pub fn request_stop(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.expect_status(&[TimerStatus::Running, TimerStatus::Paused], "request stop")?;
        self.status = TimerStatus::Saving;
        self.end_time_input = Some(format_timestamp(now));
        self.is_time_edited = false;
        Ok(())
    }

    /// Override the end time. End times after `now` are rejected; anything
    /// else, including unparsable input, is stored and reconciled on save.
    pub fn edit_end_time(&mut self, value: impl Into<String>, now: DateTime<Utc>) -> Result<()> {
        self.expect_status(&[TimerStatus::Saving], "edit the end time")?;
        let value = value.into();
        if let Some(end) = parse_timestamp(&value) {
            if end > now {
                return Err(AtelierError::InvalidInput(format!(
                    "end time {value} is in the future"
                )));
            }
        }
        self.end_time_input = Some(value);
        self.is_time_edited = true;
        Ok(())
    }

    /// Seconds to submit on stop.
    ///
    /// With an edited end time the duration is recomputed from absolute
    /// timestamps and clamps to zero when the end is unparsable or precedes
    /// the start. Otherwise it is the local counter.
    pub fn final_duration(&self) -> u64 {
        if !self.is_time_edited {
            return self.seconds;
        }

        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        self.end_time_input
            .as_deref()
            .and_then(parse_timestamp)
            .map(|end| (end - session.created_at).num_seconds())
            .and_then(|diff| u64::try_from(diff).ok())
            .unwrap_or(0)
    }

    pub fn set_note_content(&mut self, content: impl Into<String>) -> Result<()> {
        self.expect_active("edit the note")?;
        self.note.content = content.into();
        Ok(())
    }

    /// Attach a new image. The previous preview is revoked and the gallery
    /// flag is cleared; it has to be re-confirmed for every photo.
    pub fn select_note_image(&mut self, image: NoteImage, preview: PreviewHandle) -> Result<()> {
        self.expect_active("attach an image")?;
        self.note.image = Some(image);
        self.preview = Some(preview);
        self.add_to_gallery = false;
        Ok(())
    }

    pub fn clear_note_image(&mut self) -> Result<()> {
        self.expect_active("remove the image")?;
        self.note.image = None;
        self.preview = None;
        self.add_to_gallery = false;
        Ok(())
    }

    pub fn set_add_to_gallery(&mut self, enabled: bool) -> Result<()> {
        self.expect_active("change the gallery flag")?;
        self.add_to_gallery = enabled;
        Ok(())
    }

    /// Clear every local field, revoking any preview.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            session_id: self.session_id(),
            artwork_id: self.session.as_ref().map(|s| s.artwork_id.clone()),
            created_at: self.session.as_ref().map(|s| s.created_at),
            seconds: self.seconds,
            end_time_input: self.end_time_input.clone(),
            is_time_edited: self.is_time_edited,
            note_content: self.note.content.clone(),
            note_image_name: self.note.image.as_ref().map(|i| i.file_name.clone()),
            preview_url: self.preview_url().map(str::to_string),
            add_to_gallery: self.add_to_gallery,
        }
    }

    fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.session_id.clone())
    }

    fn expect_status(&self, allowed: &[TimerStatus], action: &str) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(AtelierError::InvalidState(format!("cannot {action} while {}", self.status)))
        }
    }

    fn expect_active(&self, action: &str) -> Result<()> {
        if self.status.has_session() {
            Ok(())
        } else {
            Err(AtelierError::InvalidState(format!("cannot {action} without an active session")))
        }
    }

    fn expect_pending(&self, pending: &PendingTransition, kind: TransitionKind) -> Result<()> {
        if pending.kind != kind {
            return Err(mismatched(pending, &format!("{kind:?}")));
        }
        self.expect_from(pending)
    }

    fn expect_from(&self, pending: &PendingTransition) -> Result<()> {
        if self.status != pending.from || self.session_id() != pending.session_id {
            return Err(AtelierError::InvalidState(format!(
                "timer moved to {} while {:?} was in flight",
                self.status, pending.kind
            )));
        }
        Ok(())
    }
}

fn missing_session() -> AtelierError {
    AtelierError::Internal("timer has no session in a non-idle status".into())
}

fn mismatched(pending: &PendingTransition, expected: &str) -> AtelierError {
    AtelierError::Internal(format!("{:?} transition committed as {expected}", pending.kind))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};
    use parking_lot::Mutex;

    use super::*;
    use crate::timer::ports::PreviewStore;

    #[derive(Default)]
    struct RecordingStore {
        next: Mutex<u32>,
        revoked: Mutex<Vec<String>>,
    }

    impl PreviewStore for RecordingStore {
        fn register(&self, _image: &NoteImage) -> Result<String> {
            let mut next = self.next.lock();
            *next += 1;
            Ok(format!("blob:test/{next}"))
        }

        fn revoke(&self, url: &str) {
            self.revoked.lock().push(url.to_string());
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn snapshot(seconds: u64, running: bool) -> SessionSnapshot {
        SessionSnapshot {
            session_id: "sess-1".into(),
            current_total_seconds: seconds,
            created_at: t0(),
            is_running: running,
            artwork_id: None,
        }
    }

    fn running(seconds: u64) -> TimerState {
        TimerState::from_snapshot("art-1".into(), Some(snapshot(seconds, true))).unwrap()
    }

    fn saving(seconds: u64) -> TimerState {
        let mut state = running(seconds);
        state.request_stop(t0() + Duration::hours(2)).unwrap();
        state
    }

    fn image(name: &str) -> NoteImage {
        NoteImage::new(name, "image/png", vec![1, 2, 3])
    }

    #[test]
    fn hydrates_from_snapshot() {
        let idle = TimerState::from_snapshot("art-1".into(), None).unwrap();
        assert_eq!(idle.status(), TimerStatus::Idle);
        assert!(idle.session().is_none());

        let paused = TimerState::from_snapshot("art-1".into(), Some(snapshot(120, false))).unwrap();
        assert_eq!(paused.status(), TimerStatus::Paused);
        assert_eq!(paused.seconds(), 120);
        assert_eq!(paused.session().unwrap().artwork_id, "art-1");

        assert_eq!(running(7).status(), TimerStatus::Running);
    }

    #[test]
    fn hydration_rejects_snapshot_without_session_id() {
        let mut current = snapshot(45, true);
        current.session_id = String::new();

        let result = TimerState::from_snapshot("art-1".into(), Some(current));

        assert!(matches!(result, Err(AtelierError::Remote(_))));
    }

    #[test]
    fn ticks_only_while_running() {
        let mut state = running(10);
        for _ in 0..25 {
            assert!(state.tick());
        }
        assert_eq!(state.seconds(), 35);

        let mut paused = TimerState::from_snapshot("art-1".into(), Some(snapshot(10, false))).unwrap();
        assert!(!paused.tick());
        assert_eq!(paused.seconds(), 10);

        let mut idle = TimerState::new();
        assert!(!idle.tick());
        assert_eq!(idle.seconds(), 0);
    }

    #[test]
    fn start_commits_service_snapshot() {
        let mut state = TimerState::new();
        let pending = state.prepare_start().unwrap();
        assert_eq!(pending.to_status(), TimerStatus::Running);

        state.commit_start(pending, "art-1".into(), snapshot(0, true)).unwrap();

        assert_eq!(state.status(), TimerStatus::Running);
        assert_eq!(state.session().unwrap().session_id, "sess-1");
        assert_eq!(state.session().unwrap().created_at, t0());
    }

    #[test]
    fn start_rejected_when_session_exists() {
        let err = running(0).prepare_start().unwrap_err();
        assert!(matches!(err, AtelierError::InvalidState(_)));
    }

    #[test]
    fn start_rejects_empty_session_id() {
        let mut state = TimerState::new();
        let pending = state.prepare_start().unwrap();
        let mut bad = snapshot(0, true);
        bad.session_id.clear();

        assert!(state.commit_start(pending, "art-1".into(), bad).is_err());
        assert_eq!(state.status(), TimerStatus::Idle);
    }

    #[test]
    fn dropped_pending_leaves_state_untouched() {
        let mut state = running(42);
        state.tick();
        let pending = state.prepare_toggle_pause().unwrap();
        assert_eq!(pending.kind(), TransitionKind::Pause);
        drop(pending);

        assert_eq!(state.status(), TimerStatus::Running);
        assert_eq!(state.seconds(), 43);
    }

    #[test]
    fn toggle_adopts_server_totals() {
        let mut state = running(0);
        for _ in 0..9 {
            state.tick();
        }

        let pending = state.prepare_toggle_pause().unwrap();
        state.commit_toggle_pause(pending, &snapshot(12, false)).unwrap();
        assert_eq!(state.status(), TimerStatus::Paused);
        assert_eq!(state.seconds(), 12);
        assert_eq!(state.session().unwrap().current_total_seconds, 12);

        let pending = state.prepare_toggle_pause().unwrap();
        assert_eq!(pending.kind(), TransitionKind::Resume);
        state.commit_toggle_pause(pending, &snapshot(12, true)).unwrap();
        assert_eq!(state.status(), TimerStatus::Running);
    }

    #[test]
    fn toggle_not_allowed_while_saving_or_idle() {
        assert!(saving(5).prepare_toggle_pause().is_err());
        assert!(TimerState::new().prepare_toggle_pause().is_err());
    }

    #[test]
    fn commit_rejects_stale_pending() {
        let mut state = running(0);
        let pending = state.prepare_toggle_pause().unwrap();
        state.request_stop(t0()).unwrap();

        let err = state.commit_toggle_pause(pending, &snapshot(3, false)).unwrap_err();
        assert!(matches!(err, AtelierError::InvalidState(_)));
        assert_eq!(state.status(), TimerStatus::Saving);
    }

    #[test]
    fn commit_rejects_wrong_kind() {
        let mut state = running(0);
        let pending = state.prepare_discard().unwrap();
        assert!(state.commit_toggle_pause(pending, &snapshot(0, false)).is_err());
        assert_eq!(state.status(), TimerStatus::Running);
    }

    #[test]
    fn request_stop_prefills_end_time() {
        let mut state = running(0);
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 15).unwrap();
        state.request_stop(now).unwrap();

        assert_eq!(state.status(), TimerStatus::Saving);
        assert_eq!(state.end_time_input(), Some("2024-01-01T10:30:15"));
        assert!(!state.is_time_edited());
        assert!(state.request_stop(now).is_err());
    }

    #[test]
    fn unedited_duration_is_local_counter() {
        let mut state = running(0);
        for _ in 0..5 {
            state.tick();
        }
        state.request_stop(t0() + Duration::hours(3)).unwrap();

        let (_, request) = state.prepare_save().unwrap();
        assert_eq!(request.manual_duration, 5);
    }

    #[test]
    fn edited_duration_recomputes_from_timestamps() {
        let mut state = saving(5);
        state.edit_end_time("2024-01-01T11:01:01", t0() + Duration::hours(2)).unwrap();
        assert!(state.is_time_edited());
        assert_eq!(state.final_duration(), 3661);

        state.edit_end_time("2024-01-01T11:00", t0() + Duration::hours(2)).unwrap();
        assert_eq!(state.final_duration(), 3600);
    }

    #[test]
    fn edited_duration_clamps_to_zero() {
        let mut state = saving(500);
        state.edit_end_time("2024-01-01T09:00:00", t0() + Duration::hours(2)).unwrap();
        assert_eq!(state.final_duration(), 0);

        state.edit_end_time("not a time", t0() + Duration::hours(2)).unwrap();
        assert_eq!(state.final_duration(), 0);

        state.edit_end_time("", t0() + Duration::hours(2)).unwrap();
        assert_eq!(state.final_duration(), 0);
    }

    #[test]
    fn future_end_time_is_rejected() {
        let mut state = saving(5);
        let now = t0() + Duration::minutes(30);
        let err = state.edit_end_time("2024-01-01T10:31:00", now).unwrap_err();

        assert!(matches!(err, AtelierError::InvalidInput(_)));
        assert!(!state.is_time_edited());
        assert_eq!(state.end_time_input(), Some("2024-01-01T12:00:00"));
    }

    #[test]
    fn edit_end_time_requires_saving() {
        assert!(running(0).edit_end_time("2024-01-01T10:00", t0()).is_err());
    }

    #[test]
    fn new_image_resets_gallery_flag_and_revokes_old_preview() {
        let store = Arc::new(RecordingStore::default());
        let mut state = running(0);

        let first = image("first.png");
        let handle = PreviewHandle::create(store.clone(), &first).unwrap();
        state.select_note_image(first, handle).unwrap();
        state.set_add_to_gallery(true).unwrap();
        assert!(state.add_to_gallery());

        let second = image("second.png");
        let handle = PreviewHandle::create(store.clone(), &second).unwrap();
        state.select_note_image(second, handle).unwrap();

        assert!(!state.add_to_gallery());
        assert_eq!(state.preview_url(), Some("blob:test/2"));
        assert_eq!(*store.revoked.lock(), vec!["blob:test/1".to_string()]);
    }

    #[test]
    fn gallery_flag_only_submitted_with_image() {
        let mut state = saving(5);
        state.set_add_to_gallery(true).unwrap();
        let (_, request) = state.prepare_save().unwrap();
        assert!(request.image.is_none());
        assert!(!request.add_to_gallery);
    }

    #[test]
    fn save_builds_request_and_resets() {
        let store = Arc::new(RecordingStore::default());
        let mut state = saving(5);
        state.set_note_content("blocked in the background").unwrap();
        let photo = image("wip.png");
        let handle = PreviewHandle::create(store.clone(), &photo).unwrap();
        state.select_note_image(photo, handle).unwrap();
        state.set_add_to_gallery(true).unwrap();

        let (pending, request) = state.prepare_save().unwrap();
        assert_eq!(request.session_id, "sess-1");
        assert_eq!(request.content, "blocked in the background");
        assert!(request.add_to_gallery);
        assert_eq!(request.image.as_ref().unwrap().file_name, "wip.png");

        let completed = state.commit_save(pending, &request).unwrap();
        assert_eq!(completed.duration_seconds, 5);
        assert!(completed.added_to_gallery);
        assert_eq!(state.status(), TimerStatus::Idle);
        assert!(state.session().is_none());
        assert!(state.note().is_empty());
        assert_eq!(store.revoked.lock().len(), 1);
    }

    #[test]
    fn discard_resets_from_every_active_status() {
        let paused = TimerState::from_snapshot("art-1".into(), Some(snapshot(30, false))).unwrap();
        for mut state in [running(30), paused, saving(30)] {
            let pending = state.prepare_discard().unwrap();
            state.commit_discard(pending).unwrap();
            assert_eq!(state.status(), TimerStatus::Idle);
            assert_eq!(state.seconds(), 0);
            assert!(state.end_time_input().is_none());
        }
    }

    #[test]
    fn discard_from_idle_is_invalid() {
        assert!(matches!(
            TimerState::new().prepare_discard(),
            Err(AtelierError::InvalidState(_))
        ));
    }

    #[test]
    fn note_edits_require_session() {
        let mut idle = TimerState::new();
        assert!(idle.set_note_content("x").is_err());
        assert!(idle.set_add_to_gallery(true).is_err());
        assert!(idle.clear_note_image().is_err());
    }

    #[test]
    fn snapshot_reflects_fields() {
        let mut state = saving(8);
        state.set_note_content("hands").unwrap();
        let view = state.snapshot();

        assert_eq!(view.status, TimerStatus::Saving);
        assert_eq!(view.session_id.as_deref(), Some("sess-1"));
        assert_eq!(view.artwork_id.as_deref(), Some("art-1"));
        assert_eq!(view.seconds, 8);
        assert_eq!(view.note_content, "hands");
        assert!(view.preview_url.is_none());
    }
}
