mod cli;
mod infra;
mod input;
mod portal;
mod wizard;

use talent_onboarding::error::AppError;
use tracing::warn;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

/// Line shown on stderr when a command fails. Remote failures show the server's message or
/// the generic fallback; the full error chain goes to the log.
pub fn failure_report(err: &AppError) -> String {
    warn!(error = %err, "command failed");
    format!("application error: {}", err.user_message())
}
