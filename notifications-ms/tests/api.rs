mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use notifications_ms::models::NotificationType;
use notifications_ms::routes;

use common::{bearer, TestContext};

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri("/notifications");
    if let Some(value) = authorization {
        builder = builder.header("Authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_get_returns_callers_notifications() {
    let ctx = TestContext::new();
    ctx.seed("Someone liked your post", "auth0|42", NotificationType::Like);
    ctx.seed("Someone followed you", "google|42", NotificationType::Follow);
    ctx.seed("New comment", "auth0|42", NotificationType::Comment);

    let response = routes::router(ctx.state())
        .oneshot(request("GET", Some(bearer("auth0|42"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(
        body,
        json!([
            {"id": 1, "message": "Someone liked your post", "userAuth0ID": "auth0|42", "notificationType": 2},
            {"id": 3, "message": "New comment", "userAuth0ID": "auth0|42", "notificationType": 3},
        ])
    );
}

#[tokio::test]
async fn test_get_for_unknown_owner_is_empty_array() {
    let ctx = TestContext::new();
    ctx.seed("Someone liked your post", "auth0|42", NotificationType::Like);

    let response = routes::router(ctx.state())
        .oneshot(request("GET", Some(bearer("auth0|nobody"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_missing_or_malformed_authorization_is_unauthorized() {
    let ctx = TestContext::new();
    let cases = [
        None,
        Some("Basic dXNlcjpwYXNz".to_string()),
        Some("Bearer not-a-jwt".to_string()),
    ];

    for authorization in cases {
        for method in ["GET", "DELETE"] {
            let response = routes::router(ctx.state())
                .oneshot(request(method, authorization.clone()))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body: Value = json_body(response.into_body()).await;
            assert_eq!(body["success"], json!(false));
        }
    }
}

#[tokio::test]
async fn test_delete_removes_every_row_sharing_the_local_id() {
    let ctx = TestContext::new();
    ctx.seed("a", "auth0|42", NotificationType::Like);
    ctx.seed("b", "google|42", NotificationType::Follow);
    ctx.seed("c", "auth0|7", NotificationType::Message);

    let response = routes::router(ctx.state())
        .oneshot(request("DELETE", Some(bearer("google|42"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    assert_eq!(ctx.repository.len(), 1);
    let remaining = ctx.service.get_notifications("auth0|7");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].message, "c");
}

#[tokio::test]
async fn test_delete_without_local_id_keeps_everything() {
    let ctx = TestContext::new();
    ctx.seed("a", "auth0Id1", NotificationType::Like);
    ctx.seed("b", "auth0|1", NotificationType::Like);

    let response = routes::router(ctx.state())
        .oneshot(request("DELETE", Some(bearer("auth0Id1"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.repository.len(), 2);
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();

    let response = routes::router(ctx.state())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("notifications-ms"));
}

#[tokio::test]
async fn test_metrics_route_absent_without_recorder() {
    let ctx = TestContext::new();

    let response = routes::router(ctx.state())
        .oneshot(Request::builder().uri("/api/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_route_served_with_handle() {
    let ctx = TestContext::new();
    let handle = PrometheusBuilder::new().build_recorder().handle();

    let response = routes::router(ctx.state_with_metrics(Some(handle)))
        .oneshot(Request::builder().uri("/api/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_lowercase_bearer_scheme_is_accepted() {
    let ctx = TestContext::new();
    ctx.seed("Someone liked your post", "auth0|42", NotificationType::Like);
    let authorization = bearer("auth0|42").replacen("Bearer", "bearer", 1);

    let response = routes::router(ctx.state())
        .oneshot(request("GET", Some(authorization)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
