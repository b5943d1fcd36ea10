//! Health endpoints and response headers.

use axum::http::StatusCode;
use grocery_integration_tests::TestApp;

#[tokio::test]
async fn test_health() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_checks_database() {
    let mut app = TestApp::spawn().await;
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);

    app.pool().close().await;
    assert_eq!(
        app.get("/health/ready").await.status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let mut app = TestApp::spawn().await;
    assert_eq!(app.get("/nope").await.status, StatusCode::NOT_FOUND);
}
