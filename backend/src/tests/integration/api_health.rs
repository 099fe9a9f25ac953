use axum::http::StatusCode;

use crate::tests::TestContext;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let response = ctx.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["service"], "billable-backend");
}

#[tokio::test]
async fn test_detailed_health_reports_storage() {
    let ctx = TestContext::new();
    let response = ctx.get("/health/detailed").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");
    assert_eq!(response.body["services"]["storage"]["backend"], "memory");
    assert_eq!(response.body["services"]["storage"]["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new();
    let response = ctx.get("/api/clients").await;
    let request_id = response
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header");
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}
