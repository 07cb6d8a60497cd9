use axum::{body::Body, http::Request, http::StatusCode};
use sn_common::graph::InMemoryGraph;
use std::sync::atomic::Ordering;
use tower::ServiceExt;

#[tokio::test]
async fn readyz_returns_service_unavailable_when_not_ready() {
    let state = sn_api::test_state(InMemoryGraph::new());
    state.readiness.store(false, Ordering::SeqCst);
    let app = sn_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/readyz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn health_alias_pings_backend() {
    let app = sn_api::create_router(sn_api::test_state(InMemoryGraph::new()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
