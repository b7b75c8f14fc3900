//! voice-hub entry point.
//!
//! `voice-hub` starts the HTTP server with the page, REST and WebSocket
//! endpoints. `voice-hub probe [ADDRESS]` runs one probe and exits with
//! status 0 when the server answered the handshake.

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use voice_hub::api;
use voice_hub::app_state::AppState;
use voice_hub::config::HubConfig;
use voice_hub::domain::{ProbeStatus, ServerAddress};
use voice_hub::persistence::SettingsStore;

const USAGE: &str = "usage: voice-hub [probe [ADDRESS]]";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = HubConfig::from_env().context("loading configuration")?;

    let settings = SettingsStore::load(
        &config.settings_path,
        &config.default_server_url,
        config.embed_enabled,
    )
    .await
    .context("loading saved settings")?;

    // Build application state
    let state = AppState::new(&config, settings);

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => {}
        Some("probe") => return run_probe(&state, args.next()).await,
        Some(other) => anyhow::bail!("unknown command {other:?}\n{USAGE}"),
    }

    let app = api::build_app(state, config.request_timeout());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "voice-hub listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    Ok(ExitCode::SUCCESS)
}

/// One-shot probe for scripts and health checks.
async fn run_probe(state: &AppState, address: Option<String>) -> anyhow::Result<ExitCode> {
    let address = match address {
        Some(raw) => ServerAddress::new(raw),
        None => state.settings.address().await,
    };
    let snapshot = state
        .probe_service
        .probe_and_wait(&address)
        .await
        .context("waiting for probe")?;

    println!("{}: {}", snapshot.status.as_str(), snapshot.note);
    if let Some(url) = &snapshot.socket_url {
        println!("socket: {url}");
    }

    Ok(if snapshot.status == ProbeStatus::Connected {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
