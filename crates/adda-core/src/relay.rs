//! Stream relay: forwards upstream bytes to the client verbatim.
//!
//! Whatever SSE framing the provider emits is what the client receives;
//! chunks are never parsed or re-framed. The relay pulls from upstream
//! only when the downstream consumer polls, so backpressure propagates
//! naturally, and it stops reading the moment the client cancels.

use bytes::Bytes;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use adda_types::llm::ProviderError;

use crate::llm::backend::ChunkStream;

/// Lifecycle state of one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    /// No provider selected yet.
    Idle,
    /// Provider selected, no bytes forwarded.
    ProviderSelected,
    /// At least one chunk forwarded.
    Streaming,
    /// Upstream closed normally.
    Completed,
    /// Upstream failed or the client went away.
    Aborted,
}

impl RelayState {
    /// Apply one event. Returns `None` for transitions that are not
    /// legal from the current state.
    pub fn next(self, event: RelayEvent) -> Option<RelayState> {
        use RelayEvent::*;
        use RelayState::*;
        match (self, event) {
            (Idle, Selected) => Some(ProviderSelected),
            (ProviderSelected | Streaming, Chunk) => Some(Streaming),
            (ProviderSelected | Streaming, UpstreamClosed) => Some(Completed),
            (ProviderSelected | Streaming, UpstreamError) => Some(Aborted),
            (ProviderSelected | Streaming, Cancelled) => Some(Aborted),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RelayState::Completed | RelayState::Aborted)
    }
}

/// Events that drive the relay lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEvent {
    Selected,
    Chunk,
    UpstreamClosed,
    UpstreamError,
    Cancelled,
}

/// Relays one upstream byte stream to one client until the upstream
/// ends, fails, or the client cancels.
pub struct StreamRelay {
    upstream: ChunkStream,
    provider: String,
    cancel: CancellationToken,
}

impl StreamRelay {
    pub fn new(
        upstream: ChunkStream,
        provider: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            upstream,
            provider: provider.into(),
            cancel,
        }
    }

    /// Consume the relay, yielding upstream chunks verbatim.
    ///
    /// The first upstream error is yielded to the caller and ends the
    /// stream; cancellation ends it silently and drops the upstream
    /// connection.
    pub fn into_stream(
        self,
    ) -> impl futures_util::Stream<Item = Result<Bytes, ProviderError>> + Send + 'static {
        let StreamRelay {
            mut upstream,
            provider,
            cancel,
        } = self;

        async_stream::stream! {
            let mut state = RelayState::ProviderSelected;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        state = state.next(RelayEvent::Cancelled).unwrap_or(RelayState::Aborted);
                        tracing::debug!(provider = %provider, "Client cancelled, dropping upstream");
                        break;
                    }
                    chunk = upstream.next() => match chunk {
                        Some(Ok(bytes)) => {
                            state = state.next(RelayEvent::Chunk).unwrap_or(RelayState::Streaming);
                            yield Ok(bytes);
                        }
                        Some(Err(err)) => {
                            state = state.next(RelayEvent::UpstreamError).unwrap_or(RelayState::Aborted);
                            tracing::warn!(
                                provider = %provider,
                                error = %err,
                                "Upstream failed mid-stream"
                            );
                            yield Err(err);
                            break;
                        }
                        None => {
                            state = state.next(RelayEvent::UpstreamClosed).unwrap_or(RelayState::Completed);
                            break;
                        }
                    },
                }
            }

            tracing::debug!(provider = %provider, state = ?state, "Relay finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunk_stream(items: Vec<Result<Bytes, ProviderError>>) -> ChunkStream {
        Box::pin(stream::iter(items))
    }

    #[test]
    fn transitions_follow_the_lifecycle() {
        let state = RelayState::Idle.next(RelayEvent::Selected).unwrap();
        assert_eq!(state, RelayState::ProviderSelected);

        let state = state.next(RelayEvent::Chunk).unwrap();
        assert_eq!(state, RelayState::Streaming);
        let state = state.next(RelayEvent::Chunk).unwrap();
        assert_eq!(state, RelayState::Streaming);

        assert_eq!(
            state.next(RelayEvent::UpstreamClosed),
            Some(RelayState::Completed)
        );
        assert_eq!(
            state.next(RelayEvent::UpstreamError),
            Some(RelayState::Aborted)
        );
        assert_eq!(state.next(RelayEvent::Cancelled), Some(RelayState::Aborted));
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        assert_eq!(RelayState::Idle.next(RelayEvent::Chunk), None);
        assert_eq!(RelayState::Completed.next(RelayEvent::Chunk), None);
        assert_eq!(RelayState::Aborted.next(RelayEvent::UpstreamClosed), None);
    }

    #[test]
    fn terminal_states_are_terminal() {
        assert!(RelayState::Completed.is_terminal());
        assert!(RelayState::Aborted.is_terminal());
        assert!(!RelayState::Idle.is_terminal());
        assert!(!RelayState::ProviderSelected.is_terminal());
        assert!(!RelayState::Streaming.is_terminal());
    }

    #[tokio::test]
    async fn forwards_chunks_verbatim() {
        let upstream = chunk_stream(vec![
            Ok(Bytes::from_static(b"data: {\"delta\":\"hel\"}\n\n")),
            Ok(Bytes::from_static(b"data: {\"delta\":\"lo\"}\n\n")),
            Ok(Bytes::from_static(b"data: [DONE]\n\n")),
        ]);

        let relay = StreamRelay::new(upstream, "groq", CancellationToken::new());
        let chunks: Vec<_> = relay.into_stream().collect().await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks[0].as_ref().unwrap(),
            &Bytes::from_static(b"data: {\"delta\":\"hel\"}\n\n")
        );
        assert_eq!(
            chunks[2].as_ref().unwrap(),
            &Bytes::from_static(b"data: [DONE]\n\n")
        );
    }

    #[tokio::test]
    async fn upstream_error_is_yielded_then_stream_ends() {
        let upstream = chunk_stream(vec![
            Ok(Bytes::from_static(b"data: one\n\n")),
            Err(ProviderError::Stream("connection reset".to_string())),
            Ok(Bytes::from_static(b"data: never\n\n")),
        ]);

        let relay = StreamRelay::new(upstream, "groq", CancellationToken::new());
        let chunks: Vec<_> = relay.into_stream().collect().await;

        // The chunk after the error is never forwarded.
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert!(matches!(
            chunks[1].as_ref().unwrap_err(),
            ProviderError::Stream(_)
        ));
    }

    #[tokio::test]
    async fn cancellation_stops_forwarding() {
        let upstream: ChunkStream = Box::pin(
            stream::iter(vec![Ok(Bytes::from_static(b"data: one\n\n"))])
                .chain(stream::pending()),
        );

        let token = CancellationToken::new();
        let relay = StreamRelay::new(upstream, "groq", token.clone());
        let mut out = Box::pin(relay.into_stream());

        let first = out.next().await.unwrap().unwrap();
        assert_eq!(first, Bytes::from_static(b"data: one\n\n"));

        token.cancel();
        assert!(out.next().await.is_none());
    }
}
