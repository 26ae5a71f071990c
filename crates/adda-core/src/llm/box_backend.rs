//! BoxChatBackend -- object-safe dynamic dispatch wrapper for ChatBackend.
//!
//! Follows the blanket-impl pattern:
//! 1. Define an object-safe `ChatBackendDyn` trait with boxed futures
//! 2. Blanket-impl `ChatBackendDyn` for all `T: ChatBackend`
//! 3. `BoxChatBackend` wraps `Box<dyn ChatBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use adda_types::llm::{CompletionRequest, ProviderError};

use super::backend::{ChatBackend, ChunkStream};

/// Object-safe version of [`ChatBackend`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn ChatBackendDyn`).
/// A blanket implementation is provided for all types implementing `ChatBackend`.
pub trait ChatBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn send_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

    fn open_stream_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkStream, ProviderError>> + Send + 'a>>;
}

/// Blanket implementation: any `ChatBackend` automatically implements `ChatBackendDyn`.
impl<T: ChatBackend> ChatBackendDyn for T {
    fn name(&self) -> &str {
        ChatBackend::name(self)
    }

    fn send_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>> {
        Box::pin(self.send(request))
    }

    fn open_stream_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ChunkStream, ProviderError>> + Send + 'a>> {
        Box::pin(self.open_stream(request))
    }
}

/// Type-erased chat backend for runtime provider selection.
///
/// Wraps any `ChatBackend` implementation behind dynamic dispatch so the
/// fallback chain can hold heterogeneous providers in one `Vec`.
///
/// Since `ChatBackend` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxChatBackend` provides equivalent methods that delegate to
/// the inner `ChatBackendDyn` trait object.
pub struct BoxChatBackend {
    inner: Box<dyn ChatBackendDyn + Send + Sync>,
}

impl BoxChatBackend {
    /// Wrap a concrete `ChatBackend` in a type-erased box.
    pub fn new<T: ChatBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Provider name used in logs and chain lookups.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a completion request and return the assistant's reply text.
    pub async fn send(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.inner.send_boxed(request).await
    }

    /// Open a streaming completion and return the raw upstream byte stream.
    pub async fn open_stream(
        &self,
        request: &CompletionRequest,
    ) -> Result<ChunkStream, ProviderError> {
        self.inner.open_stream_boxed(request).await
    }
}
