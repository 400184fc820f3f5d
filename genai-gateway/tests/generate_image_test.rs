mod common;

use common::{TestApp, TEST_API_KEY};
use genai_gateway::services::providers::mock::TINY_PNG_BASE64;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn upstream_returning(status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

async fn upstream_inline() -> MockServer {
    upstream_returning(200, json!({ "data": [{ "b64_json": TINY_PNG_BASE64 }] })).await
}

async fn upstream_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.body_json::<Value>().expect("upstream body is JSON"))
        .collect()
}

#[tokio::test]
async fn inline_model_stores_png_and_returns_public_url() {
    let upstream = upstream_inline().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json(
            "/api/generate-image",
            &json!({ "prompt": "  a lighthouse at dusk  ", "size": "512x512" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], true);
    assert_eq!(body["prompt"], "a lighthouse at dusk");
    assert_eq!(body["size"], "512x512");

    let filename = body["filename"].as_str().expect("filename");
    assert!(filename.ends_with(".png"));
    let image_url = body["image_url"].as_str().expect("image_url");
    assert_eq!(
        image_url,
        format!("http://127.0.0.1:{}/static/generated/{}", app.port, filename)
    );

    let stored = std::fs::read(app.generated_dir().join(filename)).expect("image written");
    assert_eq!(&stored[..4], b"\x89PNG");

    let sent = upstream_bodies(&upstream).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        json!({
            "model": "gpt-image-1",
            "prompt": "a lighthouse at dusk",
            "size": "512x512",
            "quality": "medium"
        })
    );
}

#[tokio::test]
async fn generated_image_is_served_from_static() {
    let upstream = upstream_inline().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let body: Value = app
        .post_json("/api/generate-image", &json!({ "prompt": "a cat" }))
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    let filename = body["filename"].as_str().expect("filename");
    let response = app.get(&format!("/static/generated/{}", filename)).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/png"
    );
}

#[tokio::test]
async fn each_success_gets_a_distinct_filename() {
    let upstream = upstream_inline().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let mut names = Vec::new();
    for _ in 0..2 {
        let body: Value = app
            .post_json("/api/generate-image", &json!({ "prompt": "a cat" }))
            .await
            .json()
            .await
            .expect("Failed to parse JSON");
        names.push(body["filename"].as_str().expect("filename").to_string());
    }

    assert_ne!(names[0], names[1]);
    assert!(app.generated_dir().join(&names[0]).exists());
    assert!(app.generated_dir().join(&names[1]).exists());
}

#[tokio::test]
async fn hosted_model_returns_upstream_url_without_storing() {
    let hosted = "https://cdn.example.com/img/abc.png";
    let upstream = upstream_returning(
        200,
        json!({ "data": [{ "url": hosted, "revised_prompt": "a detailed cat" }] }),
    )
    .await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json(
            "/api/generate-image",
            &json!({ "prompt": "a cat", "size": "1792x1024", "model": "dall-e-3" }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["image_url"], hosted);
    assert_eq!(body["filename"], "dall-e-3.png");
    assert_eq!(body["size"], "1792x1024");

    let stored = std::fs::read_dir(app.generated_dir())
        .expect("generated dir exists")
        .count();
    assert_eq!(stored, 0);

    let sent = upstream_bodies(&upstream).await;
    assert_eq!(sent[0]["model"], "dall-e-3");
    assert_eq!(sent[0]["quality"], "standard");
    assert_eq!(sent[0]["n"], 1);
    assert_eq!(sent[0]["response_format"], "url");
}

#[tokio::test]
async fn validation_failures_never_reach_upstream() {
    let upstream = upstream_inline().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let cases = [
        (json!({ "size": "512x512" }), "Missing prompt"),
        (json!({ "prompt": "   " }), "Missing prompt"),
        (json!({ "prompt": "x".repeat(1001) }), "Prompt too long"),
        (json!({ "prompt": "a cat", "size": "800x600" }), "Invalid size"),
        (json!({ "prompt": "p", "size": null }), "Invalid size"),
        (json!({ "prompt": "p", "size": 512 }), "Invalid size"),
        (json!({ "prompt": "p", "size": ["1024x1024"] }), "Invalid size"),
    ];

    for (payload, expected) in cases {
        let response = app.post_json("/api/generate-image", &payload).await;
        assert_eq!(response.status().as_u16(), 400, "payload {}", payload);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], expected, "payload {}", payload);
        if expected == "Invalid size" {
            assert_eq!(
                body["message"],
                "Size must be one of: 256x256, 512x512, 1024x1024, 1792x1024, 1024x1792"
            );
        }
    }

    let response = app.post_raw("/api/generate-image", "not json").await;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Invalid JSON");

    assert!(upstream_bodies(&upstream).await.is_empty());
}

#[tokio::test]
async fn prompt_of_exactly_max_length_is_accepted() {
    let upstream = upstream_inline().await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json("/api/generate-image", &json!({ "prompt": "x".repeat(1000) }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn content_policy_rejection_maps_to_400() {
    let upstream = upstream_returning(
        400,
        json!({ "error": {
            "code": "content_policy_violation",
            "message": "Your request was rejected as a result of our safety system."
        }}),
    )
    .await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json("/api/generate-image", &json!({ "prompt": "something bad" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Content policy violation");
}

#[tokio::test]
async fn rate_limit_and_quota_map_to_429() {
    let cases = [
        (
            json!({ "error": { "type": "requests", "code": "rate_limit_exceeded" } }),
            "Rate limit exceeded",
        ),
        (
            json!({ "error": { "type": "insufficient_quota", "code": "insufficient_quota" } }),
            "Quota exceeded",
        ),
    ];

    for (upstream_body, expected) in cases {
        let upstream = upstream_returning(429, upstream_body).await;
        let app = TestApp::spawn(&upstream.uri()).await;

        let response = app
            .post_json("/api/generate-image", &json!({ "prompt": "a cat" }))
            .await;

        assert_eq!(response.status().as_u16(), 429);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        assert_eq!(body["error"], expected);
    }
}

#[tokio::test]
async fn upstream_retry_after_is_forwarded_on_429() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/images/generations"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "20")
                .set_body_json(json!({ "error": { "code": "rate_limit_exceeded" } })),
        )
        .mount(&upstream)
        .await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json("/api/generate-image", &json!({ "prompt": "a cat" }))
        .await;

    assert_eq!(response.status().as_u16(), 429);
    assert_eq!(response.headers()["retry-after"], "20");
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn missing_image_data_is_an_internal_error() {
    let upstream = upstream_returning(200, json!({ "data": [] })).await;
    let app = TestApp::spawn(&upstream.uri()).await;

    let response = app
        .post_json("/api/generate-image", &json!({ "prompt": "a cat" }))
        .await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(
        body["message"],
        "An unexpected error occurred while generating the image."
    );
}

#[tokio::test]
async fn unconfigured_key_answers_500_before_validation() {
    let app = TestApp::spawn_unconfigured().await;

    let response = app.post_raw("/api/generate-image", "not json").await;

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "OpenAI API key not configured");
}
