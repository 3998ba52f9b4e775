use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use crate::{
    error::AppError,
    message::{GenerateRequest, GenerateResponse},
    state::SharedState,
};

pub const LIVENESS_MESSAGE: &str = "Backend is Live 🚀!";

pub async fn liveness_handler() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn generate_handler(
    State(state): State<SharedState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    let model = resolve_model(payload.model.as_deref(), &state.default_model);
    info!(%model, prompt_len = payload.prompt.len(), "generating content");

    let response = state
        .generator
        .generate(&payload.prompt, model)
        .await
        .inspect_err(|_| warn!(%model, "provider call failed"))?;

    Ok(Json(GenerateResponse { response }))
}

/// The requested model when it names something, otherwise the default.
pub fn resolve_model<'a>(requested: Option<&'a str>, default: &'a str) -> &'a str {
    match requested {
        Some(m) if !m.trim().is_empty() => m,
        _ => default,
    }
}
