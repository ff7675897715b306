//! Shared helpers for the HTTP-level tests: a router driven in-process with
//! `oneshot`, configured against wiremock stand-ins for the upstream APIs.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use plainpaper::api::routes::create_router;
use plainpaper::config::{Config, GeminiConfig, SpeechConfig, DEFAULT_MAX_UPLOAD_BYTES};
use plainpaper::AppState;

pub const TEST_MODEL: &str = "test-model";
pub const TEST_VOICE: &str = "test-voice";
pub const MULTIPART_BOUNDARY: &str = "plainpaper-boundary";

pub fn test_config(upstream: &MockServer, with_keys: bool) -> Config {
    Config {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        gemini: GeminiConfig {
            api_key: with_keys.then(|| "gemini-key".to_string()),
            base_url: upstream.uri(),
            model: TEST_MODEL.to_string(),
        },
        speech: SpeechConfig {
            api_key: with_keys.then(|| "speech-key".to_string()),
            base_url: upstream.uri(),
            voice_id: TEST_VOICE.to_string(),
        },
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
    }
}

/// Wraps the model reply text the way the generateContent API does.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
}

pub fn generate_path(model: &str) -> String {
    format!("/models/{model}:generateContent")
}

pub async fn mount_gemini_reply(server: &MockServer, reply: Value) {
    Mock::given(method("POST"))
        .and(path(generate_path(TEST_MODEL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(&reply.to_string())))
        .mount(server)
        .await;
}

pub fn multipart_body(content_type: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"; filename=\"form\"\r\n");
    if let Some(content_type) = content_type {
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// Minimal test application wrapper.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(config: Config) -> Self {
        Self {
            router: create_router(AppState::new(config)),
        }
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, bytes.to_vec())
    }

    /// Send a GET request and return (status, body).
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri(path)
            .method("GET")
            .body(Body::empty())
            .unwrap();
        let (status, _, bytes) = self.send(req).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Send a POST request with a JSON body and return (status, body).
    pub async fn post(&self, path: &str, payload: Value) -> (StatusCode, Value) {
        let (status, _, bytes) = self.post_raw(path, payload).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Send a POST request with a JSON body and return the undecoded response.
    pub async fn post_raw(&self, path: &str, payload: Value) -> (StatusCode, Option<String>, Vec<u8>) {
        let req = Request::builder()
            .uri(path)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap();
        self.send(req).await
    }

    /// Upload a single `file` part and return (status, body).
    pub async fn upload(&self, path: &str, content_type: Option<&str>, data: &[u8]) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri(path)
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(multipart_body(content_type, data)))
            .unwrap();
        let (status, _, bytes) = self.send(req).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}
