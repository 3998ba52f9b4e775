// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::message::ErrorResponse;
use crate::services::provider::ProviderError;

pub const GENERIC_FAILURE: &str = "Failed to generate content";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("generation failed: {0}")]
    Generation(#[from] ProviderError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        let body = Json(ErrorResponse {
            error: GENERIC_FAILURE.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
