#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::NaiveDate;
use tower::ServiceExt;
use wxlog_core::{parse_timestamp, ForecastSource, Reading, UpstreamError};
use wxlog_db::DbClient;
use wxlog_poller::LatestWeatherCache;
use wxlog_server::{AppOptions, AppState};

/// Canned forecast source that records every requested range
pub struct StubSource {
    response: Result<Vec<Reading>, UpstreamError>,
    pub calls: Mutex<Vec<(NaiveDate, NaiveDate)>>,
}

impl StubSource {
    pub fn ok(readings: Vec<Reading>) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(readings),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: UpstreamError) -> Arc<Self> {
        Arc::new(Self {
            response: Err(err),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ForecastSource for StubSource {
    async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Reading>, UpstreamError> {
        self.calls.lock().unwrap().push((start, end));
        self.response.clone()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub cache: LatestWeatherCache,
    pub db: DbClient,
}

pub async fn spawn_app(source: Arc<StubSource>, options: AppOptions) -> TestApp {
    let cache = LatestWeatherCache::new();
    let db = DbClient::in_memory().await.unwrap();
    let (router, state) =
        wxlog_server::build_app(source, cache.clone(), db.clone(), options).unwrap();
    TestApp {
        router,
        state,
        cache,
        db,
    }
}

pub fn reading(temperature: f64, ts: &str) -> Reading {
    Reading::new(temperature, parse_timestamp(ts).unwrap())
}

pub async fn send(app: &Router, method: &str, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn json_body(res: Response<Body>) -> serde_json::Value {
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
