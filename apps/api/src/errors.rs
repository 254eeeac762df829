use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::extract::ParseError;
use crate::llm_client::LlmError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Could not parse model output: {0}")]
    Parse(#[from] ParseError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Llm(e) => match e {
                LlmError::Configuration(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
                }
                LlmError::Auth => (StatusCode::BAD_GATEWAY, "LLM_AUTH_ERROR"),
                LlmError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
                LlmError::ServiceUnavailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "LLM_UNAVAILABLE")
                }
                LlmError::Network(_) => (StatusCode::GATEWAY_TIMEOUT, "NETWORK_ERROR"),
                LlmError::Protocol(_) => (StatusCode::BAD_GATEWAY, "PROTOCOL_ERROR"),
            },
            AppError::Parse(_) => (StatusCode::BAD_GATEWAY, "PARSE_ERROR"),
            AppError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Llm(LlmError::Configuration(msg)) => {
                tracing::error!("LLM configuration error: {msg}");
                "The AI service is not configured".to_string()
            }
            AppError::Llm(LlmError::Auth) => {
                tracing::error!("LLM API rejected the configured credential");
                "The AI service rejected the configured API key".to_string()
            }
            AppError::Llm(LlmError::RateLimited) => {
                tracing::warn!("LLM rate limit hit");
                "AI service rate limit exceeded. Please try again later".to_string()
            }
            AppError::Llm(e @ LlmError::ServiceUnavailable { .. }) => {
                tracing::warn!("{e}");
                "The AI service is temporarily unavailable. Please try again later".to_string()
            }
            AppError::Llm(LlmError::Network(msg)) => {
                tracing::warn!("LLM network error: {msg}");
                "Failed to reach the AI service".to_string()
            }
            AppError::Llm(LlmError::Protocol(msg)) => {
                tracing::error!("LLM protocol error: {msg}");
                "The AI service returned an unexpected response".to_string()
            }
            AppError::Parse(e) => {
                tracing::error!("Unparseable model output ({}): {}", e.message, e.raw);
                "The AI service returned output that could not be understood".to_string()
            }
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {e}");
                "A storage error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
