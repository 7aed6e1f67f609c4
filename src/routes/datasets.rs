use axum::{
    extract::{DefaultBodyLimit, Query, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::Row,
    services::{
        analysis::{self, DatasetAnalysis},
        ingest::{self, parse_delimited, parse_workbook},
    },
};
use tower_http::cors::{CorsLayer, Any};

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/datasets/analyse", post(analyse_rows))
        .route("/datasets/analyse/csv", post(analyse_csv))
        .route("/datasets/analyse/xlsx", post(analyse_xlsx))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(cors)
}

#[derive(Debug, Deserialize)]
pub struct AnalyseRequest {
    pub rows: Vec<Row>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CsvParams {
    pub delimiter: Option<String>,
}

impl CsvParams {
    fn delimiter(&self) -> Result<u8, AppError> {
        match self.delimiter.as_deref() {
            None | Some("") => Ok(b','),
            Some(raw) => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Ok(c as u8),
                    _ => Err(AppError::InvalidInput(format!(
                        "Delimiter must be a single ASCII character, got {:?}",
                        raw
                    ))),
                }
            }
        }
    }
}

pub async fn analyse_rows(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DatasetAnalysis>, AppError> {
    ingest::enforce_byte_limit(body.len(), state.config.max_file_size)?;
    let request: AnalyseRequest = serde_json::from_slice(&body)?;
    tracing::info!("Received {} JSON rows", request.rows.len());

    analyse_bounded(&state, request.rows)
}

pub async fn analyse_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CsvParams>,
    body: Bytes,
) -> Result<Json<DatasetAnalysis>, AppError> {
    ingest::enforce_byte_limit(body.len(), state.config.max_file_size)?;
    let delimiter = params.delimiter()?;
    let content = std::str::from_utf8(&body)
        .map_err(|e| AppError::ParseError(format!("Body is not valid UTF-8: {}", e)))?;

    let parse_start = std::time::Instant::now();
    let rows = parse_delimited(content, delimiter)?;
    tracing::info!("Parsed delimited upload ({}KB) in {:?}", body.len() / 1024, parse_start.elapsed());

    analyse_bounded(&state, rows)
}

pub async fn analyse_xlsx(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<DatasetAnalysis>, AppError> {
    ingest::enforce_byte_limit(body.len(), state.config.max_file_size)?;

    let parse_start = std::time::Instant::now();
    let size_kb = body.len() / 1024;
    let rows = parse_workbook(body)?;
    tracing::info!("Parsed workbook upload ({}KB) in {:?}", size_kb, parse_start.elapsed());

    analyse_bounded(&state, rows)
}

fn analyse_bounded(state: &AppState, rows: Vec<Row>) -> Result<Json<DatasetAnalysis>, AppError> {
    if rows.is_empty() {
        tracing::warn!("Rejecting empty dataset");
        return Err(AppError::InvalidInput("Dataset has no rows".to_string()));
    }
    ingest::enforce_row_limit(&rows, state.config.max_rows)?;

    let start = std::time::Instant::now();
    let analysis = analysis::analyse(&rows);
    tracing::info!(
        "Dataset analysis completed in {:?}: {} rows, {} columns",
        start.elapsed(),
        analysis.row_count,
        analysis.columns.len()
    );

    Ok(Json(analysis))
}
