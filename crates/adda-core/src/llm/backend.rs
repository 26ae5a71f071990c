//! ChatBackend trait definition.
//!
//! This is the core abstraction that all upstream providers implement.
//! Uses RPITIT for `send` and `open_stream`; the opened stream itself is
//! `Pin<Box<dyn Stream>>` (streams need to be object-safe for the
//! BoxChatBackend wrapper).

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use adda_types::llm::{CompletionRequest, ProviderError};

/// Raw bytes of an upstream streaming body, relayed without re-framing.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, ProviderError>> + Send + 'static>>;

/// Trait for upstream chat-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition) for both
/// methods. `open_stream` is itself async so that connection failures
/// surface as `Err` before any bytes flow; only such pre-stream failures
/// are eligible for fallback to the next provider.
///
/// Implementations live in adda-infra (e.g., `HttpChatBackend`).
pub trait ChatBackend: Send + Sync {
    /// Provider name used in logs and chain lookups.
    fn name(&self) -> &str;

    /// Send a completion request and return the assistant's reply text.
    fn send(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, ProviderError>> + Send;

    /// Open a streaming completion and return the raw upstream byte stream.
    fn open_stream(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<ChunkStream, ProviderError>> + Send;
}
