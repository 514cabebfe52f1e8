//! Artwork workspace command

use atelier_core::TimerSnapshot;
use atelier_domain::{Artwork, SessionRecord};
use serde::Serialize;

use super::session::open_session_timer;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Everything the workspace view needs on first render
#[derive(Debug, Clone, Serialize)]
pub struct SessionWorkspace {
    pub artwork: Artwork,
    pub timer: TimerSnapshot,
    pub history: Vec<SessionRecord>,
}

/// Load the artwork, its session history and its (possibly restored) timer.
pub async fn get_session_workspace(
    context: &AppContext,
    artwork_id: &str,
) -> Result<SessionWorkspace, String> {
    let timer = open_session_timer(context, artwork_id).await?;

    execute_command("artwork::get_session_workspace", || async {
        let (artwork, history) = tokio::try_join!(
            context.artworks.get_artwork(artwork_id),
            context.sessions.get_history(artwork_id),
        )?;
        Ok(SessionWorkspace { artwork, timer, history })
    })
    .await
}
