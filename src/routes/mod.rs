// src/routes/mod.rs
pub mod generate;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use generate::{generate_handler, liveness_handler};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/generate", post(generate_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
}
