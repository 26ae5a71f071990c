//! Chat completion types for Adda.
//!
//! These types model the data shapes exchanged with upstream providers:
//! conversation messages, completion requests, provider descriptors, and
//! provider-side error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    /// Set by clients that track when the message was written; preserved
    /// in stored records, never sent upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Request to an upstream provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub stream: bool,
}

/// Static description of one upstream provider in the fallback chain.
///
/// Descriptors come from configuration; the live backend (HTTP client,
/// resolved API key) is built from a descriptor at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique name, used in logs and for explicit provider selection.
    pub name: String,
    /// Base URL of the OpenAI-compatible API, without the
    /// `/chat/completions` suffix.
    pub base_url: String,
    /// Environment variable that holds this provider's API key.
    pub api_key_env: String,
    /// Default model requested from this provider.
    pub model: String,
    /// Model variants; when non-empty, one is picked uniformly at random
    /// per request in place of `model`.
    #[serde(default)]
    pub models: Vec<String>,
    /// Whether this provider can serve SSE streaming requests.
    #[serde(default = "default_streaming")]
    pub streaming: bool,
}

fn default_streaming() -> bool {
    true
}

/// Errors surfaced by an upstream provider backend.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure before any response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Response arrived but could not be decoded.
    #[error("failed to decode provider response: {0}")]
    Deserialization(String),

    /// The streaming body failed mid-flight.
    #[error("stream error: {0}")]
    Stream(String),

    /// Provider answered successfully with no usable text.
    #[error("provider returned an empty reply")]
    EmptyReply,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let role: MessageRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, MessageRole::User);
    }

    #[test]
    fn message_role_round_trips_through_display() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn message_role_rejects_unknown_strings() {
        let err = "moderator".parse::<MessageRole>().unwrap_err();
        assert!(err.contains("moderator"));
    }

    #[test]
    fn chat_message_omits_missing_timestamp() {
        let json = serde_json::to_string(&ChatMessage::user("hello")).unwrap();
        assert!(!json.contains("timestamp"));

        let msg: ChatMessage = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(msg.timestamp, None);
    }

    #[test]
    fn provider_descriptor_defaults_streaming_on() {
        let toml = r#"
            name = "groq"
            base_url = "https://api.groq.com/openai/v1"
            api_key_env = "GROQ_API_KEY"
            model = "llama-3.1-8b-instant"
        "#;
        let descriptor: ProviderDescriptor = toml::from_str(toml).unwrap();
        assert!(descriptor.streaming);
        assert!(descriptor.models.is_empty());
    }
}
