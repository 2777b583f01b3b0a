mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_stats::api::handlers::attribution_handler;

fn test_server() -> TestServer {
    let (state, _rx, _repo) = common::create_test_state();
    let app = Router::new()
        .route("/api/attribution", get(attribution_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_attribution_match() {
    let server = test_server();

    let response = server
        .get("/api/attribution")
        .add_query_param("url", "https://go.example.com/my-url?utm_source=mail")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_url"], "my-url");
}

#[tokio::test]
async fn test_attribution_no_match() {
    let server = test_server();

    for url in [
        "go.example.com/my-url",
        "http://go.example.com/my-url",
        "https://other.example.com/my-url",
        "https://go.example.com/",
        "not a url",
    ] {
        let response = server.get("/api/attribution").add_query_param("url", url).await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert!(json["short_url"].is_null(), "expected null for {url}");
    }
}
