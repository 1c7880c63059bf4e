mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use link_shorter::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_redirect_success() {
    let (app, repo) = common::create_test_app();
    common::create_test_link(&repo, "AbCdEf", "https://example.com/page").await;
    let server = TestServer::new(app).unwrap();

    let response = server.get("/AbCdEf").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/page");
}

#[tokio::test]
async fn test_redirect_adds_https_scheme() {
    let (app, repo) = common::create_test_app();
    common::create_test_link(&repo, "NoScheme", "example.com/page").await;
    let server = TestServer::new(app).unwrap();

    let response = server.get("/NoScheme").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/page");
}

#[tokio::test]
async fn test_redirect_counts_clicks() {
    let (app, repo) = common::create_test_app();
    common::create_test_link(&repo, "AbCdEf", "https://example.com").await;
    let server = TestServer::new(app).unwrap();

    for _ in 0..3 {
        server.get("/AbCdEf").await.assert_status(StatusCode::FOUND);
    }

    let link = repo.find_by_short_key("AbCdEf").await.unwrap().unwrap();
    assert_eq!(link.click_count, 3);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (app, repo) = common::create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_redirect_rejects_unusable_location() {
    let (app, _repo) = common::create_test_app();
    let server = TestServer::new(app).unwrap();

    let created = server
        .post("/api/links")
        .json(&serde_json::json!({ "url": "https://ex.com/\nx", "len": 6 }))
        .await
        .json::<serde_json::Value>();
    let short_key = created["shortKey"].as_str().unwrap().to_string();

    let response = server.get(&format!("/{short_key}")).await;

    response.assert_status_bad_request();
    assert!(response.headers().get("location").is_none());

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["shortKey"], short_key.as_str());
}
