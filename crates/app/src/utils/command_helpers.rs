//! Command execution helpers
//!
//! Every command times its body, logs the outcome and hands the UI a plain
//! error string.

use std::future::Future;
use std::time::Instant;

use atelier_domain::Result as DomainResult;

use crate::utils::logging::log_command_execution;

/// Run a command body with timing and structured logging.
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext, artwork_id: &str) -> Result<TimerSnapshot, String> {
///     execute_command("session::my_command", || async {
///         ctx.timer(artwork_id).await?.snapshot().await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    log_command_execution(command_name, start.elapsed(), result.as_ref().err());
    result.map_err(|err| err.to_string())
}
