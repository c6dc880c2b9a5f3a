//! HTTP Server for the learnerload API.
//!
//! Provides REST endpoints for validating bulk learner uploads.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | GET    | `/api/template`   | Download the blank CSV template      |
//! | POST   | `/api/upload`     | Upload CSV for validation            |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |
//!
//! Rejected batches are a normal `200` answer with `isValid: false`. Only
//! requests that never reach the pipeline (bad multipart, wrong file type,
//! oversized file) get a `400`.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, log_info_indent, log_warning, LOG_BROADCASTER};
use super::types::{error_response, ValidationResponse};
use crate::config::{ServerConfig, ACCEPTED_EXTENSION};
use crate::error::{ServerError, ServerResult};
use crate::parser::template_csv;
use crate::transform::pipeline::validate_bytes;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::BadRequest(_) | ServerError::UnsupportedFile(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the application router.
pub fn router(config: ServerConfig) -> Router {
    // Permissive CORS: the upload widget is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    let body_limit = config.max_upload_bytes().saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/template", get(download_template))
        .route("/api/upload", post(upload_csv))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(Arc::new(config))
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> ServerResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log_info(format!("🚀 learnerload server running on http://localhost:{}", config.port));
    log_info_indent("POST /api/upload   - Upload learner CSV", 1);
    log_info_indent("GET  /api/template - Blank CSV template", 1);
    log_info_indent("GET  /api/logs     - SSE log stream", 1);
    log_info_indent("GET  /health       - Health check", 1);
    log_info(format!("Max upload size: {}MB", config.max_upload_mb));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(config)).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "learnerload",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "template": "GET /api/template",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Blank template download
async fn download_template() -> ServerResult<impl IntoResponse> {
    let content = template_csv().map_err(|e| ServerError::Pipeline(e.into()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"learners-template.csv\"",
            ),
        ],
        content,
    ))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        // Lagged subscribers skip what they missed
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Refuse files the upload widget would not accept.
pub fn check_upload(file_name: Option<&str>, size: usize, config: &ServerConfig) -> ServerResult<()> {
    if !file_name.is_some_and(|name| name.ends_with(ACCEPTED_EXTENSION)) {
        return Err(ServerError::UnsupportedFile(
            "Unsupported file type. Please upload a .csv file.".to_string(),
        ));
    }

    if size > config.max_upload_bytes() {
        return Err(ServerError::UnsupportedFile(format!(
            "The file size is too big. Max file size: {}MB",
            config.max_upload_mb
        )));
    }

    Ok(())
}

/// Upload CSV endpoint
async fn upload_csv(
    State(config): State<Arc<ServerConfig>>,
    mut multipart: Multipart,
) -> ServerResult<Json<ValidationResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    if let Err(err) = check_upload(file_name.as_deref(), bytes.len(), &config) {
        log_warning(err.to_string());
        return Err(err);
    }

    let response = ValidationResponse::from(validate_bytes(&bytes));
    log_info(format!(
        "Job {}: {}",
        response.job_id,
        if response.is_valid { "accepted" } else { "rejected" }
    ));

    Ok(Json(response))
}
