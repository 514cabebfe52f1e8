//! REST adapter for the session service

use std::sync::Arc;

use async_trait::async_trait;
use atelier_core::SessionService;
use atelier_domain::{Result, SessionRecord, SessionSnapshot, StopSessionRequest};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use tracing::{info, instrument};

use super::client::ApiClient;
use crate::errors::InfraError;

#[derive(Serialize)]
struct StartSessionBody<'a> {
    artwork_id: &'a str,
}

/// [`SessionService`] backed by the Atelier REST API
#[derive(Clone, Debug)]
pub struct HttpSessionService {
    client: Arc<ApiClient>,
}

impl HttpSessionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    #[instrument(skip(self))]
    async fn get_current(&self) -> Result<Option<SessionSnapshot>> {
        self.client.get_optional("/sessions/current").await
    }

    #[instrument(skip(self))]
    async fn start(&self, artwork_id: &str) -> Result<SessionSnapshot> {
        self.client.post("/sessions/start", &StartSessionBody { artwork_id }).await
    }

    #[instrument(skip(self))]
    async fn toggle_pause(&self) -> Result<SessionSnapshot> {
        self.client.post_empty("/sessions/toggle-pause").await
    }

    #[instrument(skip(self, request), fields(session_id = %request.session_id))]
    async fn stop(&self, request: StopSessionRequest) -> Result<()> {
        let form = stop_form(request)?;
        self.client.post_multipart("/sessions/stop", form).await?;
        info!("session stop accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn discard(&self) -> Result<()> {
        self.client.post_ack("/sessions/discard").await
    }

    #[instrument(skip(self))]
    async fn get_history(&self, artwork_id: &str) -> Result<Vec<SessionRecord>> {
        self.client.get_segments(&["artworks", artwork_id, "sessions"]).await
    }
}

/// Multipart body of a stop submission. The image part is present only
/// when a note image is attached.
fn stop_form(request: StopSessionRequest) -> Result<Form> {
    let mut form = Form::new()
        .text("session_id", request.session_id)
        .text("manual_duration", request.manual_duration.to_string())
        .text("content", request.content)
        .text("add_to_gallery", request.add_to_gallery.to_string());

    if let Some(image) = request.image {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(InfraError::from)?;
        form = form.part("image", part);
    }

    Ok(form)
}
