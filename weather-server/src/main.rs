//! weather-widget-server – entry point.
//!
//! Startup order:
//! 1. Load configuration (file + environment).
//! 2. Initialise tracing.
//! 3. Build the weather provider; a missing API key stops startup here.
//! 4. Make sure the location file exists.
//! 5. Serve HTTP until Ctrl-C / SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use weather_widget_core::{Config, LocationStore, OpenWeatherProvider};
use weather_widget_server::{AppState, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    init_tracing(&cfg);
    info!(version = env!("CARGO_PKG_VERSION"), "weather-widget-server starting");

    let api_key = cfg.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key.to_owned(), cfg.openweather.base_url.as_str());

    let store = LocationStore::new(cfg.store_path.clone());
    let record = store
        .initialize()
        .with_context(|| format!("Failed to initialise location file {}", store.path().display()))?;
    info!(path = %store.path().display(), city = %record.city, "location store ready");

    let state = Arc::new(AppState::new(store, Arc::new(provider)));
    let app = routes::build(state);

    let addr: SocketAddr = cfg
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", cfg.server.bind_address))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("weather-widget-server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level; an invalid configured level
/// falls back to `info` with a warning on stderr.
fn init_tracing(cfg: &Config) {
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.server.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: log level '{}' is not a valid tracing filter ({}); falling back to 'info'",
                    cfg.server.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true);

    if cfg.server.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
