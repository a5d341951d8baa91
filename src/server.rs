//! HTTP front for the translation pipeline.
//!
//! - `GET /health`
//! - `POST /api/translate` with
//!   `{"text", "source_language", "target_language", "mode"?}`

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::TranslateError;
use crate::i18n::Language;
use crate::pipeline::{TranslationMode, TranslationPipeline};
use crate::security;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub mode: TranslationMode,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Clone)]
pub struct AppState {
    pub interactive: Arc<TranslationPipeline>,
    pub batch: Arc<TranslationPipeline>,
    pub api_key: Option<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = config.http_client()?;

        Ok(Self {
            interactive: Arc::new(TranslationPipeline::from_config(
                config,
                client.clone(),
                TranslationMode::Interactive,
            )),
            batch: Arc::new(TranslationPipeline::from_config(
                config,
                client,
                TranslationMode::Batch,
            )),
            api_key: config.api_key.clone(),
        })
    }

    fn pipeline(&self, mode: TranslationMode) -> &TranslationPipeline {
        match mode {
            TranslationMode::Interactive => self.interactive.as_ref(),
            TranslationMode::Batch => self.batch.as_ref(),
        }
    }
}

/// Error body plus status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Missing or invalid API key".to_string(),
        }
    }
}

impl From<TranslateError> for ApiError {
    fn from(err: TranslateError) -> Self {
        let status = match &err {
            TranslateError::EmptyInput | TranslateError::UnsupportedLanguage(_) => {
                StatusCode::BAD_REQUEST
            }
            TranslateError::ProviderExhausted { .. }
            | TranslateError::QualityThresholdExceeded { .. } => StatusCode::BAD_GATEWAY,
            TranslateError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Malformed or incomplete request bodies are client errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `0.0.0.0:{port}` and serve until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn translate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let provided = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if !security::is_authorized(state.api_key.as_deref(), provided) {
        warn!("Rejected translate request with missing or invalid API key");
        return Err(ApiError::unauthorized());
    }

    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected translate request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let source = Language::from_code(&request.source_language)?;
    let target = Language::from_code(&request.target_language)?;

    info!(
        "Translate request: {} chars, {} -> {} ({:?})",
        request.text.chars().count(),
        source,
        target,
        request.mode
    );

    let translated_text = state
        .pipeline(request.mode)
        .translate_text(&request.text, source, target)
        .await?;

    Ok(Json(TranslateResponse {
        translated_text,
        source_language: source.code().to_string(),
        target_language: target.code().to_string(),
    }))
}
