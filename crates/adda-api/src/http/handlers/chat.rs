//! Chat completion endpoint.
//!
//! POST /api/chat
//!
//! A request goes through the gateway front door: command interception
//! first (weather, news, book, and search requests answer without any
//! model call), then the provider chain with history truncation.
//! Streaming requests relay the selected provider's raw SSE bytes
//! untouched; command replies are always plain JSON even when `stream`
//! was set.

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use adda_core::gateway::GatewayReply;
use adda_core::llm::dispatch::DispatchOptions;
use adda_core::relay::StreamRelay;
use adda_types::llm::ChatMessage;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    /// Conversation history, oldest first.
    pub messages: Vec<ChatMessage>,
    /// Relay the provider's SSE stream instead of waiting for the reply.
    #[serde(default)]
    pub stream: bool,
    /// Pin the request to one provider by name.
    #[serde(default)]
    pub provider: Option<String>,
    /// Override the model for the attempt.
    #[serde(default)]
    pub model: Option<String>,
}

/// Reply body for non-streaming completions.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub content: String,
}

/// POST /api/chat - complete a conversation or relay a stream.
pub async fn send_chat(
    State(state): State<AppState>,
    Json(body): Json<SendChatRequest>,
) -> Result<Response, AppError> {
    let options = DispatchOptions {
        provider: body.provider,
        model: body.model,
    };

    // The gateway answers commands before any model is consulted; a
    // handler failure is final and never retried against the chain.
    match state
        .gateway
        .respond(&body.messages, &options, body.stream)
        .await?
    {
        GatewayReply::Command { text, .. } => {
            Ok(Json(ChatReply { content: text }).into_response())
        }

        GatewayReply::Completion(outcome) => {
            tracing::info!(
                provider = %outcome.provider,
                model = %outcome.model,
                fell_back = outcome.fell_back,
                "Completion served"
            );
            Ok(Json(ChatReply {
                content: outcome.text,
            })
            .into_response())
        }

        GatewayReply::Stream(selection) => {
            tracing::info!(
                provider = %selection.provider,
                model = %selection.model,
                "Relaying provider stream"
            );

            let relay = StreamRelay::new(
                selection.stream,
                selection.provider,
                CancellationToken::new(),
            );
            // When the client goes away axum drops this body, which drops
            // the relay and with it the upstream connection.
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "text/event-stream")
                .header(header::CACHE_CONTROL, "no-cache")
                .header(header::CONNECTION, "keep-alive")
                .body(Body::from_stream(relay.into_stream()))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(response)
        }
    }
}
