use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use burrow_core::{ShortCode, Shortened, Shortener, ShortenerError, UrlRecord};
use burrow_gateway::{App, AppState};
use burrow_generator::RandomGenerator;
use burrow_shortener::ShortenerService;
use burrow_storage::{InMemoryRepository, SqliteRepository};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

const HOST: &str = "localhost:5000";
const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];

fn in_memory_app() -> Router {
    let service = ShortenerService::new(InMemoryRepository::new(), RandomGenerator::new());
    App::router(AppState::new(Arc::new(service)))
}

fn shorten_request(body: impl Into<Body>) -> Request<Body> {
    Request::post("/shorten")
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

async fn shorten(app: &Router, body: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(app, shorten_request(body.to_string())).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn follow(app: &Router, path: &str) -> (StatusCode, Option<String>) {
    let request = Request::get(path).body(Body::empty()).unwrap();
    let (status, headers, _) = send(app, request).await;
    let location = headers
        .get(header::LOCATION)
        .map(|value| value.to_str().unwrap().to_string());
    (status, location)
}

fn code_of(short_url: &str) -> &str {
    short_url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn shorten_then_redirect() {
    let app = in_memory_app();

    let (status, body) = shorten(&app, r#"{"url": "example.com"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_url"], "https://example.com");

    let short_url = body["short_url"].as_str().unwrap();
    assert!(short_url.starts_with("http://localhost:5000/"));
    let code = code_of(short_url);
    assert!(ShortCode::new(code).is_ok(), "bad code {code:?}");

    let qr = body["qr_code"].as_str().unwrap();
    let png = BASE64
        .decode(qr.strip_prefix("data:image/png;base64,").unwrap())
        .unwrap();
    assert!(png.starts_with(&PNG_MAGIC));

    let (status, location) = follow(&app, &format!("/{code}")).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn shortening_twice_returns_same_short_url() {
    let app = in_memory_app();

    let (_, first) = shorten(&app, r#"{"url": "https://example.com/page"}"#).await;
    let (_, second) = shorten(&app, r#"{"url": "  example.com/page "}"#).await;

    assert_eq!(first["short_url"], second["short_url"]);
    assert_eq!(second["original_url"], "https://example.com/page");
}

#[tokio::test]
async fn invalid_shorten_requests_are_rejected() {
    let app = in_memory_app();

    for body in [
        r#"{}"#,
        r#"{"url": null}"#,
        r#"{"url": ""}"#,
        r#"{"url": "   "}"#,
        r#"{"url": "not a url"}"#,
        r#"{"url": "ftp://x"}"#,
    ] {
        let (status, response) = shorten(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert!(response["error"].is_string(), "body {body}");
    }
}

#[tokio::test]
async fn missing_url_has_specific_message() {
    let app = in_memory_app();

    let (_, response) = shorten(&app, "{}").await;
    assert_eq!(response["error"], "No URL provided");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = in_memory_app();

    let (status, _, _) = send(&app, shorten_request("url=example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_codes_are_bad_requests() {
    let app = in_memory_app();

    for path in ["/abc", "/abc-12", "/abcdefg"] {
        let (status, location) = follow(&app, path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "path {path}");
        assert!(location.is_none());
    }
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let app = in_memory_app();

    let request = Request::get("/zzzzzz").body(Body::empty()).unwrap();
    let (status, _, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn codes_are_case_sensitive() {
    let app = in_memory_app();

    let (_, body) = shorten(&app, r#"{"url": "example.com"}"#).await;
    let code = code_of(body["short_url"].as_str().unwrap()).to_string();
    let flipped: String = code
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect();

    if flipped != code {
        let (status, _) = follow(&app, &format!("/{flipped}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn public_base_url_overrides_host() {
    let service = ShortenerService::new(InMemoryRepository::new(), RandomGenerator::new());
    let state = AppState::new(Arc::new(service)).with_public_base_url("https://brw.example/");
    let app = App::router(state);

    let (status, body) = shorten(&app, r#"{"url": "example.com"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["short_url"]
        .as_str()
        .unwrap()
        .starts_with("https://brw.example/"));
}

#[tokio::test]
async fn unrenderable_qr_code_still_returns_mapping() {
    let base_url = format!("https://brw.example/{}", "x".repeat(8_000));
    let service = ShortenerService::new(InMemoryRepository::new(), RandomGenerator::new());
    let app = App::router(AppState::new(Arc::new(service)).with_public_base_url(base_url));

    let (status, body) = shorten(&app, r#"{"url": "example.com"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["qr_code"].is_null());
    assert_eq!(body["original_url"], "https://example.com");

    let code = code_of(body["short_url"].as_str().unwrap()).to_string();
    let (status, location) = follow(&app, &format!("/{code}")).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn undecodable_code_path_is_json_bad_request() {
    let app = in_memory_app();

    let request = Request::get("/%FF%FF%FF%FF%FF%FF")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
}

/// Fails every request as if the code space were full.
struct FullShortener;

#[async_trait]
impl Shortener for FullShortener {
    async fn shorten(&self, _original_url: &str) -> Result<Shortened, ShortenerError> {
        Err(ShortenerError::Exhausted { attempts: 10 })
    }

    async fn resolve(&self, _code: &ShortCode) -> Result<Option<UrlRecord>, ShortenerError> {
        Ok(None)
    }

    async fn shutdown(&self) {}
}

/// Records whether it was shut down.
#[derive(Default)]
struct TrackedShortener {
    shut_down: AtomicBool,
}

#[async_trait]
impl Shortener for TrackedShortener {
    async fn shorten(&self, _original_url: &str) -> Result<Shortened, ShortenerError> {
        Err(ShortenerError::Exhausted { attempts: 10 })
    }

    async fn resolve(&self, _code: &ShortCode) -> Result<Option<UrlRecord>, ShortenerError> {
        Ok(None)
    }

    async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn serve_shuts_down_shortener_when_stopped() {
    let shortener = Arc::new(TrackedShortener::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    App::serve(listener, AppState::new(shortener.clone()), async {})
        .await
        .unwrap();

    assert!(shortener.shut_down.load(Ordering::SeqCst));
}

#[tokio::test]
async fn exhaustion_is_internal_error() {
    let app = App::router(AppState::new(Arc::new(FullShortener)));

    let (status, body) = shorten(&app, r#"{"url": "example.com"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn health_check() {
    let app = in_memory_app();

    let request = Request::get("/healthz").body(Body::empty()).unwrap();
    let (status, _, body) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sqlite_backed_round_trip() {
    let repository = SqliteRepository::in_memory().await.unwrap();
    let service = ShortenerService::new(repository, RandomGenerator::new());
    let app = App::router(AppState::new(Arc::new(service)));

    let (status, body) = shorten(&app, r#"{"url": "http://example.org/x?y=1"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let code = code_of(body["short_url"].as_str().unwrap()).to_string();

    let (status, location) = follow(&app, &format!("/{code}")).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("http://example.org/x?y=1"));
}
