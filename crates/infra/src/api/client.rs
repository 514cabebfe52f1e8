//! JSON client for the Atelier REST service
//!
//! Joins paths onto the configured base URL, sends through [`HttpClient`]
//! and maps non-success statuses onto [`AtelierError`].

use std::time::Duration;

use atelier_domain::{AtelierError, Result, ServiceConfig};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// REST client bound to one base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
}

impl ApiClient {
    /// Build the client described by `config`
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(token) = config.api_token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_token(token);
        }
        Self::new(builder.build()?, &config.base_url)
    }

    pub fn new(http: HttpClient, base_url: &str) -> Result<Self> {
        // A trailing slash keeps the last path segment when joining.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| AtelierError::Config(format!("invalid service base URL {base_url}: {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` (with or without a leading slash) against the base URL
    pub fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AtelierError::Internal(format!("cannot build URL for {path}: {e}")))
    }

    /// Resolve a path from raw segments such as resource ids. Each segment is
    /// percent-encoded, so `/`, `?` and `#` stay inside it; empty, `.` and
    /// `..` segments are rejected.
    pub fn segments_url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) =
            segments.iter().find(|segment| matches!(**segment, "" | "." | ".."))
        {
            return Err(AtelierError::InvalidInput(format!("invalid path segment {segment:?}")));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AtelierError::Config(format!("service base URL {} cannot hold a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, self.url(path)?, |request| request).await?;
        read_json(response).await
    }

    /// GET a resource addressed by raw path segments, see [`Self::segments_url`]
    #[instrument(skip(self))]
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.segments_url(segments)?;
        let response = self.execute(Method::GET, url, |request| request).await?;
        read_json(response).await
    }

    /// GET a resource that may be absent: `204 No Content` and a JSON `null`
    /// body both yield `None`.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let response = self.execute(Method::GET, self.url(path)?, |request| request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(|e| AtelierError::from(InfraError::from(e)))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(&body).map_err(|e| InfraError::from(e).into())
    }

    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(Method::POST, self.url(path)?, |request| request.json(body)).await?;
        read_json(response).await
    }

    /// POST without a body, expecting JSON back
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.execute(Method::POST, self.url(path)?, |request| request).await?;
        read_json(response).await
    }

    /// POST without a body; any 2xx counts as success and the body is ignored
    #[instrument(skip(self), fields(path = %path))]
    pub async fn post_ack(&self, path: &str) -> Result<()> {
        self.execute(Method::POST, self.url(path)?, |request| request).await?;
        Ok(())
    }

    /// POST a multipart form; any 2xx counts as success and the body is
    /// ignored
    #[instrument(skip(self, form), fields(path = %path))]
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<()> {
        self.execute(Method::POST, self.url(path)?, |request| request.multipart(form)).await?;
        Ok(())
    }

    async fn execute<F>(&self, method: Method, url: Url, prepare: F) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        debug!(%method, url = %url, "service request");

        let request = prepare(self.http.request(method, url.clone()));
        let response = self.http.send(request).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(status_error(status, url.as_str(), &detail));
        }
        Ok(response)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await.map_err(|e| AtelierError::from(InfraError::from(e)))?;
    serde_json::from_slice(&body).map_err(|e| InfraError::from(e).into())
}
