// src/state.rs
use std::sync::Arc;

use crate::services::provider::ContentGenerator;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub generator: Arc<dyn ContentGenerator>,
    pub default_model: String,
}

impl AppState {
    pub fn new(generator: Arc<dyn ContentGenerator>, default_model: impl Into<String>) -> Self {
        Self {
            generator,
            default_model: default_model.into(),
        }
    }
}
