//! Conversions from external infrastructure errors into domain errors.

use atelier_domain::AtelierError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AtelierError);

impl From<InfraError> for AtelierError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AtelierError> for InfraError {
    fn from(value: AtelierError) -> Self {
        InfraError(value)
    }
}

trait IntoAtelierError {
    fn into_atelier(self) -> AtelierError;
}

/* -------------------------------------------------------------------------- */
/* HTTP status → AtelierError */
/* -------------------------------------------------------------------------- */

/// Map a non-success HTTP status to the domain error. `detail` is appended to
/// the message when the service sent one.
pub fn status_error(status: StatusCode, url: &str, detail: &str) -> AtelierError {
    let message = if detail.trim().is_empty() {
        format!("{url} returned status {status}")
    } else {
        format!("{url} returned status {status}: {}", detail.trim())
    };

    match status.as_u16() {
        401 | 403 => AtelierError::Auth(message),
        404 => AtelierError::NotFound(message),
        409 => AtelierError::Conflict(message),
        400..=499 => AtelierError::InvalidInput(message),
        500..=599 => AtelierError::Remote(message),
        _ => AtelierError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AtelierError */
/* -------------------------------------------------------------------------- */

impl IntoAtelierError for HttpError {
    fn into_atelier(self) -> AtelierError {
        if self.is_timeout() {
            return AtelierError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AtelierError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let url = self.url().map(|u| u.as_str().to_string()).unwrap_or_default();
            return status_error(status, &url, "");
        }

        if self.is_decode() {
            return AtelierError::Remote(format!("malformed response body: {self}"));
        }

        if self.is_builder() {
            return AtelierError::Internal(format!("invalid HTTP request: {self}"));
        }

        AtelierError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_atelier())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → AtelierError */
/* -------------------------------------------------------------------------- */

impl IntoAtelierError for serde_json::Error {
    fn into_atelier(self) -> AtelierError {
        AtelierError::Remote(format!("unexpected JSON payload: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_atelier())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → AtelierError */
/* -------------------------------------------------------------------------- */

impl IntoAtelierError for std::io::Error {
    fn into_atelier(self) -> AtelierError {
        match self.kind() {
            std::io::ErrorKind::NotFound => AtelierError::NotFound(self.to_string()),
            _ => AtelierError::Internal(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_atelier())
    }
}
