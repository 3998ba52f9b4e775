// src/services/provider.rs
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("prompt was blocked by the provider: {0}")]
    Blocked(String),

    #[error("provider response contained no text")]
    EmptyResponse,
}

/// Anything able to turn a prompt into generated text with a given model.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}
