use gemini_chat::message::{ErrorResponse, GenerateResponse};
use gemini_chat::routes::create_router;
use gemini_chat::services::provider::{ContentGenerator, ProviderError};
use gemini_chat::state::AppState;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

/// Records every call and answers with a canned reply or error.
#[derive(Default)]
struct MockGenerator {
    reply: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockGenerator {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            ..Default::default()
        }
    }

    fn failing() -> Self {
        Self::default()
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), model.to_string()));
        self.reply.clone().ok_or(ProviderError::EmptyResponse)
    }
}

fn app(generator: Arc<MockGenerator>) -> axum::Router {
    let state = Arc::new(AppState::new(generator, "gemini-pro"));
    create_router().with_state(state)
}

fn post_generate(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = app(Arc::new(MockGenerator::failing()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    assert_eq!(String::from_utf8(body).unwrap(), "Backend is Live 🚀!");
}

#[tokio::test]
async fn test_generate_returns_provider_text() {
    let generator = Arc::new(MockGenerator::replying("hi there"));
    let app = app(generator.clone());

    let response = app
        .oneshot(post_generate(r#"{"prompt": "hello", "model": "gemini-2.0-flash"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let resp: GenerateResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(resp.response, "hi there");
    assert_eq!(
        generator.calls(),
        vec![("hello".to_string(), "gemini-2.0-flash".to_string())]
    );
}

#[tokio::test]
async fn test_generate_without_model_uses_default() {
    let generator = Arc::new(MockGenerator::replying("4"));
    let app = app(generator.clone());

    let response = app.oneshot(post_generate(r#"{"prompt": "2+2"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        generator.calls(),
        vec![("2+2".to_string(), "gemini-pro".to_string())]
    );
}

#[tokio::test]
async fn test_provider_failure_is_generic_500() {
    let app = app(Arc::new(MockGenerator::failing()));

    let response = app.oneshot(post_generate(r#"{"prompt": "hello"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(err.error, "Failed to generate content");
}

#[tokio::test]
async fn test_malformed_body_is_generic_500_without_provider_call() {
    let generator = Arc::new(MockGenerator::replying("unused"));
    let app = app(generator.clone());

    let response = app.oneshot(post_generate(r#"{"model": "gemini-pro"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(err.error, "Failed to generate content");
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn test_server_survives_failed_request() {
    let generator = Arc::new(MockGenerator::failing());
    let app = app(generator);

    let first = app.clone().oneshot(post_generate("not json")).await.unwrap();
    assert_eq!(first.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let second = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
}
