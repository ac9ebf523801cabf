// ABOUTME: HTTP handlers for dataset upload, column reads, and results file management
// ABOUTME: Scopes uploaded tables to the caller's session id header
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::json_body;
use crate::constants::routes;
use crate::dataset::{ClearOutcome, DatasetFormat, DatasetTable};
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::server::AppState;

/// Body of `POST /get_dataset_rows`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRowsRequest {
    /// Column to read
    pub column_name: String,
}

/// Body of `POST /save_dataset_result`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResultRequest {
    /// Prompt sent to the chatbot
    pub prompt: String,
    /// Chatbot response
    pub response: String,
    /// Results file relative to the results directory
    #[serde(default)]
    pub results_file_path: Option<String>,
}

/// `?file_path=` for download and clear
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsPathQuery {
    /// Results file relative to the results directory
    #[serde(default)]
    pub file_path: Option<String>,
}

/// `{columns}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Column names in file order
    pub columns: Vec<String>,
}

/// `{rows}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRowsResponse {
    /// Column values, blanks as `""`
    pub rows: Vec<String>,
}

/// `{status, message}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Always `ok`
    pub status: String,
    /// What happened
    pub message: String,
}

impl StatusResponse {
    fn ok(message: String) -> Self {
        Self {
            status: "ok".to_owned(),
            message,
        }
    }
}

/// Session id from the request headers
fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(routes::SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(routes::DEFAULT_SESSION)
        .to_owned()
}

/// Dataset routes implementation
pub struct DatasetRoutes;

impl DatasetRoutes {
    /// Create the dataset routes, relative to the API prefix
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/upload_dataset", post(Self::handle_upload))
            .route("/get_dataset_rows", post(Self::handle_get_rows))
            .route("/save_dataset_result", post(Self::handle_save_result))
            .route("/download_dataset_results", get(Self::handle_download))
            .route("/clear_dataset_results", post(Self::handle_clear))
            .with_state(state)
    }

    /// Handle POST /upload_dataset
    async fn handle_upload(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        mut multipart: Multipart,
    ) -> Result<Json<UploadResponse>, AppError> {
        let session = session_id(&headers);

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_input(format!("Invalid multipart body: {e}")))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let file_name = field.file_name().unwrap_or_default().to_owned();
            let format = DatasetFormat::from_file_name(&file_name)?;

            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::invalid_input(format!("Failed to read upload: {e}")))?;
            let table = DatasetTable::parse(format, &bytes)?;

            info!(session = %session, file = %file_name, "Dataset uploaded");
            let columns = state.datasets.insert(&session, table);
            return Ok(Json(UploadResponse { columns }));
        }

        Err(AppError::invalid_input("Multipart field 'file' is required"))
    }

    /// Handle POST /get_dataset_rows
    async fn handle_get_rows(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        body: Result<Json<DatasetRowsRequest>, JsonRejection>,
    ) -> Result<Json<DatasetRowsResponse>, AppError> {
        let request = json_body(body)?;
        let rows = state
            .datasets
            .column_values(&session_id(&headers), &request.column_name)?;

        Ok(Json(DatasetRowsResponse { rows }))
    }

    /// Handle POST /save_dataset_result
    async fn handle_save_result(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        body: Result<Json<SaveResultRequest>, JsonRejection>,
    ) -> Result<Json<StatusResponse>, AppError> {
        let request = json_body(body)?;
        let file = state
            .results
            .append(
                request.results_file_path.as_deref(),
                &request.prompt,
                &request.response,
            )
            .await?;

        AppLogger::log_dataset_event(&session_id(&headers), "save_result", &file.display_name());
        Ok(Json(StatusResponse::ok(format!(
            "Result saved to {}.",
            file.display_name()
        ))))
    }

    /// Handle GET /download_dataset_results
    async fn handle_download(
        State(state): State<Arc<AppState>>,
        Query(query): Query<ResultsPathQuery>,
    ) -> Result<Response, AppError> {
        let (file, bytes) = state.results.read(query.file_path.as_deref()).await?;

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.file_name()),
                ),
            ],
            bytes,
        )
            .into_response())
    }

    /// Handle POST /clear_dataset_results
    async fn handle_clear(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Query(query): Query<ResultsPathQuery>,
    ) -> Result<Json<StatusResponse>, AppError> {
        let (file, outcome) = state.results.clear(query.file_path.as_deref()).await?;

        AppLogger::log_dataset_event(&session_id(&headers), "clear_results", &file.display_name());
        let message = match outcome {
            ClearOutcome::Removed => format!("Results file cleared: {}", file.display_name()),
            ClearOutcome::Absent => {
                format!("No existing file to clear at: {}", file.display_name())
            }
        };
        Ok(Json(StatusResponse::ok(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_id_defaults_when_absent_or_blank() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_id(&headers), "default");

        headers.insert(routes::SESSION_HEADER, HeaderValue::from_static("  "));
        assert_eq!(session_id(&headers), "default");

        headers.insert(routes::SESSION_HEADER, HeaderValue::from_static("run-42"));
        assert_eq!(session_id(&headers), "run-42");
    }
}
