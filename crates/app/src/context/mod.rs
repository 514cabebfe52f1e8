//! Application context - dependency injection container

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use atelier_core::{ArtworkService, Clock, SessionService, SessionTimer, SystemClock};
use atelier_domain::{ArtworkId, AtelierError, Config, Result};
use atelier_infra::{ApiClient, HttpArtworkService, HttpSessionService, InMemoryPreviewStore};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Application context - holds all services and the open timers
pub struct AppContext {
    pub config: Config,
    pub sessions: Arc<dyn SessionService>,
    pub artworks: Arc<dyn ArtworkService>,
    pub previews: Arc<InMemoryPreviewStore>,
    clock: Arc<dyn Clock>,
    /// One timer per artwork workspace currently open in the UI
    timers: Mutex<HashMap<ArtworkId, Arc<SessionTimer>>>,
}

impl AppContext {
    /// Create a context from the environment or a config file
    pub fn new() -> Result<Self> {
        Self::new_with_config(atelier_infra::config::load()?)
    }

    /// Create a context talking to the service described by `config`
    pub fn new_with_config(config: Config) -> Result<Self> {
        let client = Arc::new(ApiClient::from_config(&config.service)?);
        info!(base_url = %client.base_url(), "session service configured");

        let sessions: Arc<dyn SessionService> = Arc::new(HttpSessionService::new(client.clone()));
        let artworks: Arc<dyn ArtworkService> = Arc::new(HttpArtworkService::new(client));
        Ok(Self::with_services(config, sessions, artworks))
    }

    /// Create a context around explicit service implementations
    pub fn with_services(
        config: Config,
        sessions: Arc<dyn SessionService>,
        artworks: Arc<dyn ArtworkService>,
    ) -> Self {
        Self {
            config,
            sessions,
            artworks,
            previews: Arc::new(InMemoryPreviewStore::new()),
            clock: Arc::new(SystemClock),
            timers: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the wall clock handed to timers opened afterwards
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Timer of an open artwork workspace
    ///
    /// # Errors
    /// `AtelierError::NotFound` if no timer is open for `artwork_id`.
    pub async fn timer(&self, artwork_id: &str) -> Result<Arc<SessionTimer>> {
        self.timers.lock().await.get(artwork_id).cloned().ok_or_else(|| {
            AtelierError::NotFound(format!("no session timer open for artwork {artwork_id}"))
        })
    }

    /// Get the timer for `artwork_id`, creating an idle one if needed.
    ///
    /// Returns the timer and whether it was created by this call.
    pub async fn open_timer(&self, artwork_id: &str) -> Result<(Arc<SessionTimer>, bool)> {
        if artwork_id.trim().is_empty() {
            return Err(AtelierError::InvalidInput("artwork id must not be empty".into()));
        }

        let mut timers = self.timers.lock().await;
        if let Some(existing) = timers.get(artwork_id) {
            return Ok((existing.clone(), false));
        }

        let timer = Arc::new(
            SessionTimer::new(artwork_id, self.sessions.clone(), self.previews.clone())
                .with_clock(self.clock.clone())
                .with_tick_interval(Duration::from_millis(self.config.timer.tick_interval_ms)),
        );
        timers.insert(artwork_id.to_string(), timer.clone());
        debug!(artwork_id, open_timers = timers.len(), "session timer opened");
        Ok((timer, true))
    }

    /// Stop and forget the timer for `artwork_id`. Returns whether one was
    /// open.
    pub async fn close_timer(&self, artwork_id: &str) -> bool {
        let removed = self.timers.lock().await.remove(artwork_id);
        match removed {
            Some(timer) => {
                timer.shutdown().await;
                debug!(artwork_id, "session timer closed");
                true
            }
            None => false,
        }
    }

    pub async fn open_timer_count(&self) -> usize {
        self.timers.lock().await.len()
    }

    /// Shut every open timer down. Remote sessions are left as they are.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        let timers: Vec<_> = self.timers.lock().await.drain().collect();
        for (artwork_id, timer) in timers {
            timer.shutdown().await;
            debug!(artwork_id = %artwork_id, "session timer shut down");
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("base_url", &self.config.service.base_url)
            .finish_non_exhaustive()
    }
}
