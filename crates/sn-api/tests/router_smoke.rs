use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sn_common::graph::InMemoryGraph;
use tower::ServiceExt;

fn app() -> axum::Router {
    sn_api::create_router(sn_api::test_state(InMemoryGraph::new()))
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn banner_and_livez_are_healthy() {
    let app = app();

    let (status, body) = send(app.clone(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "memory");

    let (status, body) = send(app, get("/livez")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = app().oneshot(get("/livez")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn error_bodies_echo_the_request_id() {
    let request = Request::builder()
        .uri("/api/users/nobody")
        .header("x-request-id", "req-42")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["request_id"], "req-42");
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app();

    let (status, ada) = send(
        app.clone(),
        post_json(
            "/api/users",
            json!({
                "name": "  Ada Lovelace ",
                "email": "Ada@Example.com",
                "skills": ["Rust", "rust", "Go"],
                "company": "Analytical Engines",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ada["name"], "Ada Lovelace");
    assert_eq!(ada["email"], "ada@example.com");
    assert_eq!(ada["skills"], json!(["Go", "Rust"]));
    assert_eq!(ada["company"], "Analytical Engines");

    let (status, _) = send(
        app.clone(),
        post_json(
            "/api/users",
            json!({ "name": "Impostor", "email": "ada@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        app.clone(),
        post_json("/api/users", json!({ "name": "Bad", "email": "not-an-email" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "validation_error");

    let (status, alan) = send(
        app.clone(),
        post_json(
            "/api/users",
            json!({ "name": "Alan Turing", "email": "alan@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let ada_id = ada["user_id"].as_str().unwrap();
    let alan_id = alan["user_id"].as_str().unwrap();

    let uri = format!("/api/users/{ada_id}/connections");
    let (status, body) = send(app.clone(), post_json(&uri, json!({ "user_id": alan_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], true);

    let (status, body) = send(app.clone(), post_json(&uri, json!({ "user_id": alan_id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["created"], false);

    let (status, _) = send(app.clone(), post_json(&uri, json!({ "user_id": ada_id }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(app.clone(), post_json(&uri, json!({ "user_id": "ghost" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, detail) = send(app.clone(), get(&format!("/api/users/{ada_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["connections"], json!([alan_id]));

    let (status, list) = send(app.clone(), get("/api/users?limit=10")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada Lovelace", "Alan Turing"]);
    assert_eq!(list[0]["connection_count"], 1);
    assert_eq!(list[0]["skill_count"], 2);

    let (status, list) = send(app.clone(), get("/api/users?limit=1&offset=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["name"], "Alan Turing");

    let (status, _) = send(app, get("/api/users?limit=0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn query_examples_are_listed() {
    let (status, body) = send(app(), get("/api/query/examples")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["examples"].as_array().unwrap().is_empty());
    assert!(body["note"].is_string());
}
