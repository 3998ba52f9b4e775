// src/client/relay_api.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::message::{ErrorResponse, GenerateRequest, GenerateResponse};

#[derive(Debug, Error)]
pub enum RelayClientError {
    #[error("could not reach relay: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("relay returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("relay response was not understood: {0}")]
    Decode(reqwest::Error),
}

/// The chat client's view of the relay service.
#[async_trait]
pub trait RelayApi: Send + Sync {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, RelayClientError>;
}

#[derive(Clone)]
pub struct HttpRelayClient {
    client: Client,
    base_url: String,
}

impl HttpRelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RelayApi for HttpRelayClient {
    async fn generate(&self, prompt: &str, model: Option<&str>) -> Result<String, RelayClientError> {
        let request = GenerateRequest {
            prompt: prompt.to_string(),
            model: model.map(str::to_string),
        };

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(RelayClientError::Status { status, message });
        }

        let body: GenerateResponse = response.json().await.map_err(RelayClientError::Decode)?;
        Ok(body.response)
    }
}
