
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn health_reports_connected_store() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["databases"]["memory"], "connected");
    assert_eq!(body["mailer"], "configured");
    assert!(body["timestamp"].is_string());
    assert!(body["uptime"].is_string());
}

#[actix_rt::test]
async fn missing_store_degrades_health_and_returns_503() {
    let app = TestApp::spawn_without_store().await;

    let body: Value = app.get("/api/health").await.json().await.unwrap();
    assert_eq!(body["status"], "DEGRADED");
    assert_eq!(body["databases"]["memory"], "not configured");

    for path in ["/api/projects", "/api/projects/featured", "/api/contact/stats/overview"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Database is not configured");
    }

    let response = app.post_json("/api/contact/submit", &contact_body("Ada")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_rt::test]
async fn unknown_routes_return_json_404() {
    let app = TestApp::spawn().await;

    for path in ["/api/unknown", "/nowhere", "/api/projects/stats"] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
    }

    let body: Value = app.get("/nowhere").await.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Route not found" }));
}

#[actix_rt::test]
async fn root_lists_endpoint_roots() {
    let app = TestApp::spawn().await;

    let body: Value = app.get("/").await.json().await.unwrap();

    assert_eq!(body["endpoints"]["projects"], "/api/projects");
    assert_eq!(body["endpoints"]["contact"], "/api/contact");
    assert_eq!(body["endpoints"]["health"], "/api/health");
}

#[actix_rt::test]
async fn trailing_slashes_are_normalised() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/projects/").await;
    assert_eq!(response.status(), StatusCode::OK);
}
