//! Session timer commands
//!
//! One command per user action in an artwork workspace. The UI keeps no
//! timer state of its own: every command returns the timer snapshot (or the
//! completed session) to render, and errors come back as display strings.

use async_trait::async_trait;
use atelier_core::{ConfirmationPrompt, DiscardOutcome, TimerEvent, TimerSnapshot};
use atelier_domain::{CompletedSession, NoteImage, SessionRecord};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Prompt answered up front by a UI that shows its own confirmation dialog
#[derive(Debug, Clone, Copy)]
pub struct AcknowledgedPrompt(pub bool);

#[async_trait]
impl ConfirmationPrompt for AcknowledgedPrompt {
    async fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Open (or reuse) the timer for an artwork workspace.
///
/// The timer is hydrated from the user's current remote session before its
/// snapshot is returned, also when another caller opened it first. If that
/// lookup fails the timer is closed again so the next open retries.
pub async fn open_session_timer(
    context: &AppContext,
    artwork_id: &str,
) -> Result<TimerSnapshot, String> {
    execute_command("session::open_session_timer", || async {
        let (timer, created) = context.open_timer(artwork_id).await?;
        debug!(artwork_id, created, "session timer opened");

        match timer.restore().await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(artwork_id, error = %err, "timer bootstrap failed; closing timer");
                context.close_timer(artwork_id).await;
                Err(err)
            }
        }
    })
    .await
}

pub async fn close_session_timer(context: &AppContext, artwork_id: &str) -> Result<bool, String> {
    execute_command("session::close_session_timer", || async {
        Ok(context.close_timer(artwork_id).await)
    })
    .await
}

pub async fn get_session_timer(
    context: &AppContext,
    artwork_id: &str,
) -> Result<TimerSnapshot, String> {
    execute_command("session::get_session_timer", || async {
        Ok(context.timer(artwork_id).await?.snapshot().await)
    })
    .await
}

/// Subscribe to state changes and ticks of an open timer, e.g. to forward
/// them to the UI as events.
pub async fn subscribe_session_events(
    context: &AppContext,
    artwork_id: &str,
) -> Result<broadcast::Receiver<TimerEvent>, String> {
    execute_command("session::subscribe_session_events", || async {
        Ok(context.timer(artwork_id).await?.subscribe())
    })
    .await
}

pub async fn start_session(context: &AppContext, artwork_id: &str) -> Result<TimerSnapshot, String> {
    execute_command("session::start_session", || async {
        context.timer(artwork_id).await?.start().await
    })
    .await
}

/// Pause when running, resume when paused
pub async fn toggle_session_pause(
    context: &AppContext,
    artwork_id: &str,
) -> Result<TimerSnapshot, String> {
    execute_command("session::toggle_session_pause", || async {
        context.timer(artwork_id).await?.toggle_pause().await
    })
    .await
}

/// Open the save dialog; the end time is pre-filled with the current time
pub async fn request_session_stop(
    context: &AppContext,
    artwork_id: &str,
) -> Result<TimerSnapshot, String> {
    execute_command("session::request_session_stop", || async {
        context.timer(artwork_id).await?.request_stop().await
    })
    .await
}

pub async fn edit_session_end_time(
    context: &AppContext,
    artwork_id: &str,
    end_time: String,
) -> Result<TimerSnapshot, String> {
    execute_command("session::edit_session_end_time", || async {
        context.timer(artwork_id).await?.edit_end_time(end_time).await
    })
    .await
}

pub async fn set_session_note(
    context: &AppContext,
    artwork_id: &str,
    content: String,
) -> Result<TimerSnapshot, String> {
    execute_command("session::set_session_note", || async {
        context.timer(artwork_id).await?.set_note_content(content).await
    })
    .await
}

pub async fn select_session_image(
    context: &AppContext,
    artwork_id: &str,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
) -> Result<TimerSnapshot, String> {
    execute_command("session::select_session_image", || async {
        debug!(artwork_id, file_name = %file_name, len = bytes.len(), "note image selected");
        let image = NoteImage::new(file_name, content_type, bytes);
        context.timer(artwork_id).await?.select_note_image(image).await
    })
    .await
}

pub async fn clear_session_image(
    context: &AppContext,
    artwork_id: &str,
) -> Result<TimerSnapshot, String> {
    execute_command("session::clear_session_image", || async {
        context.timer(artwork_id).await?.clear_note_image().await
    })
    .await
}

/// Toggle "also add this photo to the gallery"
pub async fn set_session_gallery_flag(
    context: &AppContext,
    artwork_id: &str,
    enabled: bool,
) -> Result<TimerSnapshot, String> {
    execute_command("session::set_session_gallery_flag", || async {
        context.timer(artwork_id).await?.set_add_to_gallery(enabled).await
    })
    .await
}

/// Submit the session with its reconciled duration and note
pub async fn save_session(
    context: &AppContext,
    artwork_id: &str,
) -> Result<CompletedSession, String> {
    execute_command("session::save_session", || async {
        context.timer(artwork_id).await?.confirm_save().await
    })
    .await
}

/// Delete the current session. Returns `false` when the prompt declined and
/// nothing was sent.
pub async fn discard_session(
    context: &AppContext,
    artwork_id: &str,
    prompt: &dyn ConfirmationPrompt,
) -> Result<bool, String> {
    execute_command("session::discard_session", || async {
        let outcome = context.timer(artwork_id).await?.discard(prompt).await?;
        Ok(outcome == DiscardOutcome::Discarded)
    })
    .await
}

/// Past sessions of an artwork, newest first as delivered by the service
pub async fn get_session_history(
    context: &AppContext,
    artwork_id: &str,
) -> Result<Vec<SessionRecord>, String> {
    execute_command("session::get_session_history", || async {
        match context.timer(artwork_id).await {
            Ok(timer) => timer.history().await,
            Err(_) => context.sessions.get_history(artwork_id).await,
        }
    })
    .await
}
