use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use opentelemetry::{
    metrics::{Counter, MeterProvider},
    KeyValue,
};
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use wxlog_core::{aggregate, ForecastSource, HistorySeries};
use wxlog_db::DbClient;
use wxlog_poller::{today_in, LatestWeatherCache, PollOutcome};

mod error;

pub use error::ApiError;

/// Request-independent knobs for the HTTP surface
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub timezone: Tz,
    /// Trailing window length; the window ends yesterday
    pub history_days: u32,
    pub recent_limit: u32,
    /// Reuse the computed history until the local date changes
    pub cache_history_per_day: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::New_York,
            history_days: 5,
            recent_limit: 5,
            cache_history_per_day: false,
        }
    }
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    polls_total: Counter<u64>,
    source: Arc<dyn ForecastSource>,
    cache: LatestWeatherCache,
    db: DbClient,
    options: AppOptions,
    history_memo: Mutex<Option<(NaiveDate, HistorySeries)>>,
}

impl AppState {
    /// Count one poller cycle
    pub fn record_poll(&self, outcome: PollOutcome) {
        self.polls_total
            .add(1, &[KeyValue::new("outcome", outcome.as_str())]);
    }

    fn count_request(&self, route: &'static str) {
        self.requests_total.add(1, &[KeyValue::new("route", route)]);
    }
}

pub fn build_app(
    source: Arc<dyn ForecastSource>,
    cache: LatestWeatherCache,
    db: DbClient,
    options: AppOptions,
) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter().with_registry(registry.clone()).build()?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("wxlog-server");

    let requests_total = meter
        .u64_counter("wxlog_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let polls_total = meter
        .u64_counter("wxlog_polls_total")
        .with_description("Poller cycles by outcome")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        polls_total,
        source,
        cache,
        db,
        options,
        history_memo: Mutex::new(None),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/weather", get(weather))
        .route("/history", get(history))
        .route("/save", post(save))
        .route("/recent", get(recent))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.count_request("/healthz");
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

/// Latest cached reading, or `{}` before the first successful poll
async fn weather(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    state.count_request("/weather");
    match state.cache.get().await {
        Some(reading) => Json(serde_json::json!(reading)),
        None => Json(serde_json::json!({})),
    }
}

/// Daily averages for the trailing window ending yesterday
async fn history(State(state): State<Arc<AppState>>) -> Result<Json<HistorySeries>, ApiError> {
    state.count_request("/history");
    let today = today_in(state.options.timezone);

    if state.options.cache_history_per_day {
        let memo = state.history_memo.lock().await;
        if let Some((day, series)) = memo.as_ref() {
            if *day == today {
                return Ok(Json(series.clone()));
            }
        }
    }

    let (start, end) = history_window(today, state.options.history_days);
    let readings = state.source.fetch_range(start, end).await?;
    let series = HistorySeries::from(aggregate(&readings)?);
    tracing::debug!(%start, %end, days = series.timestamp.len(), "history computed");

    if state.options.cache_history_per_day {
        *state.history_memo.lock().await = Some((today, series.clone()));
    }

    Ok(Json(series))
}

/// Inclusive range covering `days` days before `today`
pub fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let days = i64::from(days.max(1));
    (today - Duration::days(days), today - Duration::days(1))
}

/// Persist the current cached reading
async fn save(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    state.count_request("/save");
    let reading = state.cache.get().await.ok_or(ApiError::NoReading)?;

    let id = state
        .db
        .append(reading.temperature, &reading.timestamp_string())
        .await?;
    tracing::info!(id, temperature = reading.temperature, "temperature saved");

    Ok(Json(serde_json::json!({ "message": "Temperature saved!" })))
}

#[derive(Debug, Serialize)]
struct RecentEntry {
    temperature: f64,
    timestamp: String,
}

/// Most recent saved temperatures, newest first
async fn recent(State(state): State<Arc<AppState>>) -> Result<Json<Vec<RecentEntry>>, ApiError> {
    state.count_request("/recent");
    let rows = state.db.recent(state.options.recent_limit).await?;

    let entries = rows
        .into_iter()
        .map(|row| RecentEntry {
            temperature: row.temperature,
            timestamp: row.timestamp,
        })
        .collect();
    Ok(Json(entries))
}
