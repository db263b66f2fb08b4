mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use program_service::api::handlers::health_handler;

fn make_server() -> TestServer {
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(common::create_test_state());
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = make_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["programs"]["status"], "ok");
    assert_eq!(json["checks"]["taxonomy"]["status"], "ok");
    assert_eq!(json["checks"]["taxonomy"]["message"], "3 cancer types");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let server = make_server();

    let json = server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("programs").is_some());
    assert!(json["checks"].get("taxonomy").is_some());
}
