mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::spawn_app;

#[tokio::test]
async fn test_preview_success() {
    let app = spawn_app();
    let code = app.shorten("https://openai.com/research").await;

    let response = app.server.get(&format!("/preview/{code}")).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["short_code"], code.as_str());
    assert_eq!(body["original_url"], "https://openai.com/research");
    assert_eq!(body["click_count"], 0);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_preview_does_not_count_click() {
    let app = spawn_app();
    let code = app.shorten("https://example.com").await;

    for _ in 0..3 {
        app.server
            .get(&format!("/preview/{code}"))
            .await
            .assert_status_ok();
    }
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    assert_eq!(app.mapping(&code).await.click_count, 0);
}

#[tokio::test]
async fn test_preview_reports_clicks_after_redirects() {
    let app = spawn_app();
    let code = app.shorten("https://example.com").await;

    for _ in 0..3 {
        app.server
            .get(&format!("/{code}"))
            .await
            .assert_status(StatusCode::FOUND);
    }
    app.wait_for_clicks(&code, 3).await;

    let response = app.server.get(&format!("/preview/{code}")).await;
    let body: Value = response.json();
    assert_eq!(body["click_count"], 3);
}

#[tokio::test]
async fn test_preview_not_found() {
    let app = spawn_app();

    let response = app.server.get("/preview/zzzzzz").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_preview_without_code() {
    let app = spawn_app();

    let response = app.server.get("/preview").await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["message"], "Short code is required");
}
