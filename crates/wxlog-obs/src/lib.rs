use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging.
/// - JSON logs on stdout
/// - RUST_LOG respected; default is info with debug for the wxlog crates
pub fn init(service_name: &str) {
    let default_filter =
        "info,wxlog_server=debug,wxlog_poller=debug,wxlog_forecast=debug,wxlog_db=debug";
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::registry()
        .with(EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(service = %service_name, "Observability initialized");
}
