mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use common::{send, spawn_app, StubSource};
use tower::ServiceExt;
use wxlog_poller::PollOutcome;
use wxlog_server::AppOptions;

#[tokio::test]
async fn health_ready_metrics_endpoints() {
    let app = spawn_app(StubSource::ok(vec![]), AppOptions::default()).await;

    // /healthz returns 200 and increments a counter
    let res = send(&app.router, "GET", "/healthz").await;
    assert_eq!(res.status(), StatusCode::OK);

    // /readyz initially 503
    let res = send(&app.router, "GET", "/readyz").await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    wxlog_server::set_ready(&app.state, true);

    let res = send(&app.router, "GET", "/readyz").await;
    assert_eq!(res.status(), StatusCode::OK);

    app.state.record_poll(PollOutcome::Updated);
    app.state.record_poll(PollOutcome::Failed);

    // /metrics returns prometheus text and contains our counters
    let res = send(&app.router, "GET", "/metrics").await;
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain"));
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("wxlog_requests_total"));
    assert!(text.contains("wxlog_polls_total"));
    assert!(text.contains("outcome=\"failed\""));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let app = spawn_app(StubSource::ok(vec![]), AppOptions::default()).await;

    let res = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/weather")
                .header(header::ORIGIN, "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = spawn_app(StubSource::ok(vec![]), AppOptions::default()).await;

    let res = send(&app.router, "GET", "/api/v1/current").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
