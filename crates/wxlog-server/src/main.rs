use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tracing::{error, info};
use wxlog_core::ForecastSource;
use wxlog_db::DbClient;
use wxlog_forecast::{ForecastSettings, OpenMeteoClient};
use wxlog_poller::{LatestWeatherCache, Poller};
use wxlog_server::AppOptions;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    wxlog_obs::init("wxlogd");

    // Config
    let cfg = wxlog_config::AppConfig::load().context("Failed to load configuration")?;
    let timezone: Tz = cfg
        .timezone()
        .parse()
        .map_err(|e| anyhow!("invalid timezone {}: {}", cfg.timezone(), e))?;

    let source: Arc<dyn ForecastSource> = Arc::new(OpenMeteoClient::new(ForecastSettings {
        base_url: cfg.upstream_base_url(),
        latitude: cfg.latitude(),
        longitude: cfg.longitude(),
        timezone: cfg.timezone(),
        timeout: Duration::from_secs(cfg.upstream_timeout_secs()),
    })?);

    let db = DbClient::open(cfg.db_path())
        .await
        .context("Failed to open temperature log")?;

    let cache = LatestWeatherCache::new();

    // Build app and state
    let (app, state) = wxlog_server::build_app(
        Arc::clone(&source),
        cache.clone(),
        db,
        AppOptions {
            timezone,
            history_days: cfg.history_days(),
            recent_limit: cfg.recent_limit(),
            cache_history_per_day: cfg.history_cache_per_day(),
        },
    )?;

    // Start poller in background
    let poll_state = Arc::clone(&state);
    let poller = Poller::new(
        source,
        cache,
        Duration::from_secs(cfg.poll_interval_secs().max(1)),
        timezone,
    )
    .with_outcome_hook(move |outcome| poll_state.record_poll(outcome));
    let poller_task = tokio::spawn(async move { poller.run().await });

    // Start HTTP server
    let addr: SocketAddr = cfg
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind TCP listener")?;

    // Mark ready just before serving
    wxlog_server::set_ready(&state, true);

    info!(%addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    poller_task.abort();
    info!("wxlogd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
