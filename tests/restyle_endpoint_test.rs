//! End-to-end tests for the HTTP router with a fake completion service

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use kodegen_tools_restyle::completion::CompletionError;
use kodegen_tools_restyle::config::ServerConfig;
use kodegen_tools_restyle::server::router;
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;

use common::{FakeCompletion, test_state};

fn restyle_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/restyle")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn default_config() -> ServerConfig {
    ServerConfig::builder().build().unwrap()
}

#[tokio::test]
async fn test_restyle_returns_css_verbatim() {
    let css = "body { background: hotpink !important; }\n/* not validated */ ::: {";
    let fake = FakeCompletion::replying(css);
    let app = router(test_state(default_config(), fake.clone()));

    let (status, body) = send(
        app,
        restyle_request(&json!({
            "prompt": "  pink everything  ",
            "html_structure": "<div data-x=\"1\"><script>t()</script><p class=\"lead\">Hi</p></div>"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "generated_style": css }));

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "pink everything");
    assert_eq!(calls[0].1, r#"<div><p class="lead">Hi</p></div>"#);
}

#[tokio::test]
async fn test_blank_prompt_rejected() {
    let fake = FakeCompletion::replying("x");
    let app = router(test_state(default_config(), fake.clone()));

    let (status, body) = send(
        app,
        restyle_request(&json!({ "prompt": "   ", "html_structure": "<p>a</p>" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("prompt"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_missing_field_rejected_with_detail() {
    let app = router(test_state(default_config(), FakeCompletion::replying("x")));
    let (status, body) = send(app, restyle_request(&json!({ "prompt": "dark" }))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = router(test_state(default_config(), FakeCompletion::replying("x")));
    let request = Request::builder()
        .method("POST")
        .uri("/restyle")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_oversized_html_rejected() {
    let config = ServerConfig::builder().max_html_bytes(1024).build().unwrap();
    let fake = FakeCompletion::replying("x");
    let app = router(test_state(config, fake.clone()));

    let (status, body) = send(
        app,
        restyle_request(&json!({
            "prompt": "dark",
            "html_structure": "<p>a</p>".repeat(200)
        })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].as_str().unwrap().contains("1024"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_body_over_transport_limit_rejected() {
    let config = ServerConfig::builder().max_html_bytes(16).build().unwrap();
    let app = router(test_state(config, FakeCompletion::replying("x")));

    // Larger than max_html_bytes plus the envelope allowance
    let html = "x".repeat(200 * 1024);
    let (status, _) = send(
        app,
        restyle_request(&json!({ "prompt": "dark", "html_structure": html })),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_completion_errors_map_to_statuses() {
    let cases: [(fn() -> CompletionError, StatusCode); 5] = [
        (
            || CompletionError::NotConfigured {
                provider: "openrouter",
                env_var: "OPENROUTER_API_KEY",
            },
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            || CompletionError::RateLimited {
                retry_after: Some(Duration::from_secs(3)),
            },
            StatusCode::TOO_MANY_REQUESTS,
        ),
        (
            || CompletionError::ContentPolicy("flagged".into()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            || CompletionError::Upstream {
                status: 500,
                body: "boom".into(),
            },
            StatusCode::BAD_GATEWAY,
        ),
        (|| CompletionError::EmptyResponse, StatusCode::BAD_GATEWAY),
    ];

    for (make_error, expected) in cases {
        let app = router(test_state(default_config(), FakeCompletion::failing(make_error)));
        let (status, body) = send(
            app,
            restyle_request(&json!({ "prompt": "dark", "html_structure": "<p>a</p>" })),
        )
        .await;

        assert_eq!(status, expected);
        assert!(
            body["detail"]
                .as_str()
                .unwrap()
                .starts_with("Error generating style:")
        );
    }
}

#[tokio::test]
async fn test_health() {
    let app = router(test_state(default_config(), FakeCompletion::replying("x")));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let app = router(test_state(default_config(), FakeCompletion::replying("x")));
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/restyle")
                .header(header::ORIGIN, "https://www.youtube.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let config = ServerConfig::builder()
        .cors_allowed_origins(["https://allowed.example"])
        .build()
        .unwrap();
    let state = test_state(config, FakeCompletion::replying("x"));

    let preflight = |origin: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri("/restyle")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    };

    let allowed = router(state.clone())
        .oneshot(preflight("https://allowed.example"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://allowed.example"
    );

    let denied = router(state)
        .oneshot(preflight("https://evil.example"))
        .await
        .unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
