//! File Content Extractor - text extraction server for PDF, DOCX and TXT uploads.

mod config;
mod error;
mod extractor;
mod ocr;
mod processors;
mod response;
mod result;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use config::AppConfig;
use extractor::FileContentExtractor;
use ocr::azure::AzureReadProvider;
use response::FileContentExtractionResponse;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    extractor: FileContentExtractor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "file_content_extractor=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Lifespan: starting...");

    let config = AppConfig::from_env()?;

    // Initialize OCR provider
    let ocr = AzureReadProvider::new(&config.ocr, reqwest::Client::new());
    info!("OCR provider initialized: {}", config.ocr.endpoint);

    let state = AppState {
        extractor: FileContentExtractor::new(Arc::new(ocr)),
    };

    let app = router(state, config.max_upload_bytes);

    // Run server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on http://{}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Lifespan: stopped");
    Ok(())
}

fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/scrape-file-content", post(scrape_file_content))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

type ValidationError = (StatusCode, Json<serde_json::Value>);

fn validation_error(status: StatusCode, field: &str, msg: impl Into<String>) -> ValidationError {
    (
        status,
        Json(serde_json::json!({
            "detail": [{ "field": field, "msg": msg.into() }]
        })),
    )
}

/// Upload a file and extract its text.
async fn scrape_file_content(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileContentExtractionResponse>), ValidationError> {
    let span = info_span!("scrape_file_content", request_id = %uuid::Uuid::new_v4());

    async move {
        let mut upload = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            validation_error(StatusCode::BAD_REQUEST, "file", format!("Multipart error: {}", e))
        })? {
            if field.name() == Some("file") {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    validation_error(
                        StatusCode::BAD_REQUEST,
                        "file",
                        format!("Failed to read file: {}", e),
                    )
                })?;
                upload = Some((filename, content_type, data));
                break;
            }
        }

        let (filename, content_type, data) = upload.ok_or_else(|| {
            validation_error(StatusCode::UNPROCESSABLE_ENTITY, "file", "Field required")
        })?;

        info!(
            "Received file: {} ({} bytes, {})",
            filename,
            data.len(),
            content_type
        );

        let outcome = state.extractor.extract(&filename, data, &content_type).await;

        let status = if outcome.success {
            StatusCode::CREATED
        } else {
            StatusCode::from_u16(outcome.http_status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        };

        Ok((status, Json(FileContentExtractionResponse::from(outcome))))
    }
    .instrument(span)
    .await
}
