//! Shared test helpers for `atelier-core` integration tests.
//!
//! Lightweight scripted fakes for the timer's ports so the tests can focus on
//! transitions instead of plumbing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use atelier_core::{Clock, ConfirmationPrompt, PreviewStore, SessionService, SessionTimer};
use atelier_domain::{
    AtelierError, NoteImage, Result, SessionRecord, SessionSnapshot, StopSessionRequest,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;

pub const ARTWORK_ID: &str = "art-1";
pub const SESSION_ID: &str = "sess-1";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
}

pub fn snapshot(seconds: u64, running: bool) -> SessionSnapshot {
    SessionSnapshot {
        session_id: SESSION_ID.into(),
        current_total_seconds: seconds,
        created_at: t0(),
        is_running: running,
        artwork_id: Some(ARTWORK_ID.into()),
    }
}

pub fn image(name: &str) -> NoteImage {
    NoteImage::new(name, "image/jpeg", vec![0xff, 0xd8, 0xff])
}

/// Calls recorded by [`ScriptedSessionService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetCurrent,
    Start(String),
    TogglePause,
    Stop(StopSessionRequest),
    Discard,
    History(String),
}

/// Session service that replays queued responses in order
#[derive(Default)]
pub struct ScriptedSessionService {
    current: Mutex<Option<SessionSnapshot>>,
    current_failures: Mutex<VecDeque<AtelierError>>,
    snapshots: Mutex<VecDeque<Result<SessionSnapshot>>>,
    acks: Mutex<VecDeque<Result<()>>>,
    history: Mutex<Vec<SessionRecord>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSessionService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_current(self: Arc<Self>, current: SessionSnapshot) -> Arc<Self> {
        *self.current.lock() = Some(current);
        self
    }

    /// Fail the next current-session lookup with `err`.
    pub fn fail_current_once(&self, err: AtelierError) {
        self.current_failures.lock().push_back(err);
    }

    /// Queue the response of the next start/toggle call.
    pub fn push_snapshot(&self, response: Result<SessionSnapshot>) {
        self.snapshots.lock().push_back(response);
    }

    /// Queue the response of the next stop/discard call.
    pub fn push_ack(&self, response: Result<()>) {
        self.acks.lock().push_back(response);
    }

    pub fn set_history(&self, records: Vec<SessionRecord>) {
        *self.history.lock() = records;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn stop_requests(&self) -> Vec<StopSessionRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Stop(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn next_snapshot(&self) -> Result<SessionSnapshot> {
        self.snapshots
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AtelierError::Internal("no scripted snapshot".into())))
    }

    fn next_ack(&self) -> Result<()> {
        self.acks.lock().pop_front().unwrap_or(Ok(()))
    }
}

#[async_trait]
impl SessionService for ScriptedSessionService {
    async fn get_current(&self) -> Result<Option<SessionSnapshot>> {
        self.calls.lock().push(Call::GetCurrent);
        if let Some(err) = self.current_failures.lock().pop_front() {
            return Err(err);
        }
        Ok(self.current.lock().clone())
    }

    async fn start(&self, artwork_id: &str) -> Result<SessionSnapshot> {
        self.calls.lock().push(Call::Start(artwork_id.to_string()));
        self.next_snapshot()
    }

    async fn toggle_pause(&self) -> Result<SessionSnapshot> {
        self.calls.lock().push(Call::TogglePause);
        self.next_snapshot()
    }

    async fn stop(&self, request: StopSessionRequest) -> Result<()> {
        self.calls.lock().push(Call::Stop(request));
        self.next_ack()
    }

    async fn discard(&self) -> Result<()> {
        self.calls.lock().push(Call::Discard);
        self.next_ack()
    }

    async fn get_history(&self, artwork_id: &str) -> Result<Vec<SessionRecord>> {
        self.calls.lock().push(Call::History(artwork_id.to_string()));
        Ok(self.history.lock().clone())
    }
}

/// Preview store that hands out sequential URLs and remembers revocations
#[derive(Default)]
pub struct RecordingPreviewStore {
    issued: Mutex<Vec<String>>,
    revoked: Mutex<Vec<String>>,
}

impl RecordingPreviewStore {
    pub fn live(&self) -> Vec<String> {
        let revoked = self.revoked.lock();
        self.issued.lock().iter().filter(|url| !revoked.contains(url)).cloned().collect()
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().clone()
    }
}

impl PreviewStore for RecordingPreviewStore {
    fn register(&self, image: &NoteImage) -> Result<String> {
        let mut issued = self.issued.lock();
        let url = format!("blob:test/{}/{}", issued.len() + 1, image.file_name);
        issued.push(url.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        self.revoked.lock().push(url.to_string());
    }
}

/// Clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Prompt with a fixed answer that counts how often it was asked
pub struct FixedPrompt {
    answer: bool,
    asked: Mutex<usize>,
}

impl FixedPrompt {
    pub fn accepting() -> Self {
        Self { answer: true, asked: Mutex::new(0) }
    }

    pub fn declining() -> Self {
        Self { answer: false, asked: Mutex::new(0) }
    }

    pub fn asked(&self) -> usize {
        *self.asked.lock()
    }
}

#[async_trait]
impl ConfirmationPrompt for FixedPrompt {
    async fn confirm(&self, _message: &str) -> bool {
        *self.asked.lock() += 1;
        self.answer
    }
}

/// Timer wired to the fakes above
pub struct Harness {
    pub timer: SessionTimer,
    pub service: Arc<ScriptedSessionService>,
    pub previews: Arc<RecordingPreviewStore>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_service(ScriptedSessionService::new())
    }

    pub fn with_service(service: Arc<ScriptedSessionService>) -> Self {
        let previews = Arc::new(RecordingPreviewStore::default());
        let clock = ManualClock::at(t0());
        let timer = SessionTimer::new(ARTWORK_ID, service.clone(), previews.clone())
            .with_clock(clock.clone());
        Self { timer, service, previews, clock }
    }

    /// Start a session whose service snapshot reports `seconds`.
    pub async fn started(seconds: u64) -> Self {
        let harness = Self::new();
        harness.service.push_snapshot(Ok(snapshot(seconds, true)));
        harness.timer.start().await.unwrap();
        harness
    }
}
