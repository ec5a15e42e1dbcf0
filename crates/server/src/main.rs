use std::time::Duration;

use tracing_subscriber::EnvFilter;

use clinic_voice_config::load_settings;
use clinic_voice_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings()?;
    let addr = settings.server.bind_addr();
    let session = settings.session.clone();

    let state = AppState::new(settings);

    // Shutdown sender kept alive for the process lifetime
    let _cleanup = session.cleanup_enabled.then(|| {
        state.sessions.start_cleanup_task(
            Duration::from_secs(session.idle_timeout_secs),
            Duration::from_secs(session.cleanup_interval_secs),
        )
    });

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "clinic voice receptionist listening");
    axum::serve(listener, router).await?;

    Ok(())
}
