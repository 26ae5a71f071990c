//! HttpChatBackend -- concrete [`ChatBackend`] for OpenAI-compatible APIs.
//!
//! Sends requests to `{base_url}/chat/completions` with bearer
//! authentication. One implementation serves Groq and any other
//! OpenAI-compatible endpoint via configurable base URLs. Streamed bodies
//! are handed back raw for the relay to forward verbatim.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use futures_util::TryStreamExt;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use adda_core::llm::backend::{ChatBackend, ChunkStream};
use adda_types::llm::{CompletionRequest, MessageRole, ProviderError};

/// Shared HTTP client for the gateway.
///
/// One client is reused across providers and command services so they
/// share a connection pool. Per-request deadlines are applied by callers;
/// only the connect timeout is fixed here.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// OpenAI-compatible chat backend.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the Authorization header. It never appears in Debug
/// output or tracing logs.
pub struct HttpChatBackend {
    client: reqwest::Client,
    name: String,
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl HttpChatBackend {
    pub fn new(
        client: reqwest::Client,
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            base_url: base_url.into(),
            api_key,
            timeout,
        }
    }

    /// Full URL of the chat completions endpoint.
    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Convert a [`CompletionRequest`] into the wire shape, borrowing the
    /// message bodies instead of cloning them.
    fn wire_request<'a>(&self, request: &'a CompletionRequest) -> WireRequest<'a> {
        WireRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: &m.role,
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            stream: request.stream,
        }
    }
}

impl ChatBackend for HttpChatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let body = self.wire_request(request);

        let call = async {
            let response = self
                .client
                .post(self.url())
                .bearer_auth(self.api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Http {
                    status: status.as_u16(),
                    message: extract_api_error(&error_body),
                });
            }

            let wire: WireResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Deserialization(e.to_string()))?;
            extract_content(wire)
        };

        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        }
    }

    async fn open_stream(&self, request: &CompletionRequest) -> Result<ChunkStream, ProviderError> {
        let body = self.wire_request(request);

        let connect = async {
            let response = self
                .client
                .post(self.url())
                .bearer_auth(self.api_key.expose_secret())
                .json(&body)
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Http {
                    status: status.as_u16(),
                    message: extract_api_error(&error_body),
                });
            }
            Ok(response)
        };

        // The deadline covers connection and response headers only; chunks
        // of a live stream are not individually deadlined.
        let response = match tokio::time::timeout(self.timeout, connect).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProviderError::Timeout {
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| ProviderError::Stream(e.to_string()));
        Ok(Box::pin(stream))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    stream: bool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a MessageRole,
    content: &'a str,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireReply,
}

#[derive(Deserialize)]
struct WireReply {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the reply text out of the first choice.
fn extract_content(response: WireResponse) -> Result<String, ProviderError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(ProviderError::EmptyReply);
    }
    Ok(content)
}

/// Pull the human-readable message out of an OpenAI-style error body
/// (`{"error": {"message": "..."}}`), falling back to the raw text.
fn extract_api_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
