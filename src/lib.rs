//! Tabular dataset analysis: per-column type detection and summaries, plus
//! heuristic chart recommendations, served over a small HTTP API.

use axum::Router;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

pub use models::{CellValue, Row};
pub use services::analysis::{analyse, analyse_at, DatasetAnalysis};

// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self { config }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let max_file_size = state.config.max_file_size;
    Router::new()
        .merge(routes::routes())
        .merge(routes::datasets::routes(max_file_size))
        .with_state(state)
}
