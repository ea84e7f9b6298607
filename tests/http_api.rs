//! Router-level tests for the HTTP surface.
//!
//! These exercise the paths that need no running MongoDB: parameter
//! validation and the 404 fallback.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use mongo_storage_stats::routes::build_routes;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_url_is_rejected() {
    let response = build_routes().oneshot(get("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Invalid URL parameter"})
    );
}

#[tokio::test]
async fn empty_url_is_rejected() {
    let response = build_routes().oneshot(get("/stats?url=")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Invalid URL parameter"})
    );
}

#[tokio::test]
async fn empty_host_among_multiple_urls_is_rejected() {
    let response = build_routes()
        .oneshot(get("/stats?url=localhost:27017&url="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Invalid URL parameter"})
    );
}

#[tokio::test]
async fn validation_failure_does_not_wait_on_other_parameters() {
    // Everything else present and well-formed; only url is missing.
    let response = build_routes()
        .oneshot(get(
            "/stats?replicaSet=rs0&maxPoolSize=10&ssl=true&tls=true&dbPrefix=app_",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Invalid URL parameter"})
    );
}

#[tokio::test]
async fn trailing_slash_reaches_the_stats_route() {
    // A validation error, not the 404 fallback, proves the alias is routed.
    let response = build_routes().oneshot(get("/stats/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Invalid URL parameter"})
    );
}

#[tokio::test]
async fn error_responses_are_json() {
    let response = build_routes().oneshot(get("/stats")).await.unwrap();

    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let response = build_routes().oneshot(get("/unknown")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Endpoint not found"})
    );
}

#[tokio::test]
async fn root_path_is_not_found() {
    let response = build_routes().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Endpoint not found"})
    );
}

#[tokio::test]
async fn wrong_method_on_stats_is_not_found() {
    let request = Request::builder()
        .method("POST")
        .uri("/stats?url=localhost:27017")
        .body(Body::empty())
        .unwrap();
    let response = build_routes().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response.into_body()).await,
        json!({"error": "Endpoint not found"})
    );
}
