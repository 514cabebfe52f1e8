use std::time::Duration;

use atelier_domain::AtelierError;
use tracing::{debug, info, warn};

/// Log the outcome of a command execution with structured fields.
///
/// `command` is a stable identifier such as `"session::start"`; callers must
/// not put user content in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&AtelierError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        // Local guards reject clicks that raced a transition; not worth a warning.
        Some(err) if !err.is_remote_failure() => debug!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_rejected"
        ),
        Some(err) => warn!(
            command,
            duration_ms,
            error_type = error_label(err),
            error = %err,
            "command_execution_failure"
        ),
    }
}

/// Convert an `AtelierError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &AtelierError) -> &'static str {
    match error {
        AtelierError::Network(_) => "network",
        AtelierError::Auth(_) => "auth",
        AtelierError::NotFound(_) => "not_found",
        AtelierError::Conflict(_) => "conflict",
        AtelierError::InvalidInput(_) => "invalid_input",
        AtelierError::InvalidState(_) => "invalid_state",
        AtelierError::Remote(_) => "remote",
        AtelierError::Config(_) => "config",
        AtelierError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&AtelierError::InvalidState("idle".into())), "invalid_state");
        assert_eq!(error_label(&AtelierError::Remote("502".into())), "remote");
        assert_eq!(error_label(&AtelierError::Conflict("busy".into())), "conflict");
    }
}
