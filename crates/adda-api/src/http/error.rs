//! Application error type mapping to HTTP status codes and the
//! `{"error": "..."}` envelope the web client expects.
//!
//! Input-class errors (bad conversation, unknown provider) map to 400.
//! Exhausted chains and command-handler failures are server errors; the
//! caller gets a stable user-safe message while the upstream detail goes
//! to the logs only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use adda_core::gateway::GatewayError;
use adda_types::error::{CommandError, DispatchError, StoreError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Provider chain errors.
    Dispatch(DispatchError),
    /// Intercepted command handler errors.
    Command(CommandError),
    /// Chat store errors.
    Store(StoreError),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError::Dispatch(e)
    }
}

impl From<CommandError> for AppError {
    fn from(e: CommandError) -> Self {
        AppError::Command(e)
    }
}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Command(err) => AppError::Command(err),
            GatewayError::Dispatch(err) => AppError::Dispatch(err),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Dispatch(DispatchError::EmptyConversation) => (
                StatusCode::BAD_REQUEST,
                "conversation must contain at least one message".to_string(),
            ),
            AppError::Dispatch(DispatchError::UnknownProvider(name)) => {
                (StatusCode::BAD_REQUEST, format!("unknown provider: {name}"))
            }
            AppError::Dispatch(DispatchError::StreamingUnsupported(name)) => (
                StatusCode::BAD_REQUEST,
                format!("provider does not support streaming: {name}"),
            ),
            AppError::Dispatch(err @ DispatchError::Exhausted { .. }) => {
                tracing::error!(error = %err, "All providers failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "all providers are currently unavailable".to_string(),
                )
            }
            AppError::Command(CommandError::MissingApiKey(env)) => {
                tracing::error!(env = %env, "Command service key missing");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "that service is not configured".to_string(),
                )
            }
            AppError::Command(err) => {
                tracing::error!(error = %err, "Command handler failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "that service is currently unavailable".to_string(),
                )
            }
            AppError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "chat not found".to_string())
            }
            AppError::Store(err) => {
                tracing::error!(error = %err, "Chat store query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage failure".to_string(),
                )
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
