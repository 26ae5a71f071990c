use thiserror::Error;

use crate::llm::ProviderError;

/// Errors from walking the provider fallback chain.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("conversation has no messages")]
    EmptyConversation,

    #[error("unknown provider: '{0}'")]
    UnknownProvider(String),

    #[error("provider '{0}' does not support streaming")]
    StreamingUnsupported(String),

    /// Every attempted provider failed; `last` holds the final failure.
    #[error("provider chain exhausted after {attempts} attempts")]
    Exhausted {
        attempts: usize,
        #[source]
        last: Option<ProviderError>,
    },
}

/// Errors from intercepted command handlers.
///
/// Command failures are terminal: a failed weather or news lookup is
/// reported to the caller, never retried against the provider chain.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{service} returned HTTP {status}")]
    Service { service: &'static str, status: u16 },

    #[error("{service} request failed: {message}")]
    Network {
        service: &'static str,
        message: String,
    },

    #[error("missing API key: set {0}")]
    MissingApiKey(String),

    #[error("{service} returned an unusable response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },
}

/// Errors from chat record storage (used by trait definitions in adda-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query error: {0}")]
    Query(String),

    #[error("chat not found")]
    NotFound,
}
