pub mod admin;
pub mod browse;
pub mod cli;
pub mod patient;
pub mod shell;

use carebook_core::api::{AppContext, CliError, Services, SessionEvent};
use serde::Serialize;

use cli::OutputFormat;

/// Builds services, forwards session events to the log, and runs the startup
/// probe. Returns once the session is ready.
pub async fn connect(ctx: &AppContext) -> Result<Services, CliError> {
    let services = ctx.build_services().await?;
    let mut event_rx = services.session.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            match event {
                SessionEvent::Ready {
                    backend_reachable,
                    authenticated,
                    ..
                } => {
                    tracing::info!(
                        target: "carebook.cli",
                        backend_reachable,
                        authenticated,
                        "session ready"
                    );
                }
                SessionEvent::LoggedIn { user_id, .. } => {
                    tracing::debug!(target: "carebook.cli", user_id, "logged in");
                }
                SessionEvent::LoggedOut { .. } => {
                    tracing::debug!(target: "carebook.cli", "logged out");
                }
            }
        }
    });
    services.session.initialize().await;
    Ok(services)
}

pub fn emit<T, F>(format: OutputFormat, value: &T, text: F) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => {
            let out = crate::render::json(value).map_err(|e| CliError::Anyhow(e.into()))?;
            println!("{out}");
        }
        OutputFormat::Text => {
            let out = text();
            println!("{}", out.trim_end());
        }
    }
    Ok(())
}
