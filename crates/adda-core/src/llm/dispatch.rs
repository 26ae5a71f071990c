//! Ordered provider fallback dispatch.
//!
//! Routes completion requests through the provider chain in configured
//! order. Every request walks the full chain from the top: there is no
//! circuit breaker and no cross-request health state, trading efficiency
//! for simplicity and avoiding stale-failure false negatives. Attempts
//! are sequential, never parallel, so one request holds at most one
//! upstream call in flight.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use adda_types::config::GatewayConfig;
use adda_types::error::DispatchError;
use adda_types::llm::{ChatMessage, CompletionRequest, ProviderDescriptor, ProviderError};

use super::backend::ChunkStream;
use super::box_backend::BoxChatBackend;
use super::truncate::truncate_to_budget;

/// One provider in the fallback chain: its static descriptor plus the
/// live backend built from it at startup.
pub struct ChainEntry {
    pub descriptor: ProviderDescriptor,
    pub backend: BoxChatBackend,
}

/// The ordered provider chain, fixed for the process lifetime.
pub struct ProviderChain {
    entries: Vec<ChainEntry>,
}

impl ProviderChain {
    pub fn new(entries: Vec<ChainEntry>) -> Self {
        Self { entries }
    }

    /// Look up an entry by exact provider name.
    pub fn get(&self, name: &str) -> Option<&ChainEntry> {
        self.entries.iter().find(|e| e.descriptor.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChainEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a successful completion through the chain.
#[derive(Debug)]
pub struct DispatchOutcome {
    /// The assistant's reply text.
    pub text: String,
    /// Name of the provider that handled the request.
    pub provider: String,
    /// Model actually requested from that provider.
    pub model: String,
    /// Whether a non-primary provider handled the request.
    pub fell_back: bool,
}

/// Result of selecting a provider for streaming.
pub struct StreamSelection {
    /// Raw upstream bytes from the selected provider.
    pub stream: ChunkStream,
    /// Name of the provider that is streaming.
    pub provider: String,
    /// Model actually requested from that provider.
    pub model: String,
}

impl std::fmt::Debug for StreamSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSelection")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("stream", &"<stream>")
            .finish()
    }
}

/// Per-request options from the caller.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Pin the request to this provider instead of walking the chain.
    pub provider: Option<String>,
    /// Override the model for every attempted provider.
    pub model: Option<String>,
}

/// Routes conversations through the provider chain with history truncation.
///
/// Holds only read-only configuration, so one `Dispatcher` is shared by
/// all concurrent requests.
pub struct Dispatcher {
    chain: ProviderChain,
    history_budget: u32,
    reply_max_tokens: u32,
    temperature: f64,
}

impl Dispatcher {
    pub fn new(chain: ProviderChain, config: &GatewayConfig) -> Self {
        Self {
            chain,
            history_budget: config.history_budget,
            reply_max_tokens: config.reply_max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Send a conversation through the chain and return the first
    /// successful reply.
    ///
    /// Providers are tried strictly in chain order; a failure is logged
    /// and the next provider is tried without delay. An empty (trimmed)
    /// reply counts as a failure.
    pub async fn dispatch(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut rng = StdRng::from_os_rng();
        self.dispatch_with_rng(conversation, options, &mut rng).await
    }

    /// `dispatch` with an injected RNG for deterministic variant picks.
    pub async fn dispatch_with_rng<R: Rng>(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
        rng: &mut R,
    ) -> Result<DispatchOutcome, DispatchError> {
        if conversation.is_empty() {
            return Err(DispatchError::EmptyConversation);
        }

        if let Some(name) = &options.provider {
            let entry = self
                .chain
                .get(name)
                .ok_or_else(|| DispatchError::UnknownProvider(name.clone()))?;
            let request = self.build_request(entry, conversation, options, false, rng);
            return match try_entry(entry, &request).await {
                Ok(text) => Ok(DispatchOutcome {
                    text,
                    provider: entry.descriptor.name.clone(),
                    model: request.model,
                    fell_back: false,
                }),
                Err(err) => {
                    tracing::warn!(
                        provider = %entry.descriptor.name,
                        error = %err,
                        "Pinned provider failed"
                    );
                    Err(DispatchError::Exhausted {
                        attempts: 1,
                        last: Some(err),
                    })
                }
            };
        }

        let mut attempts = 0;
        let mut last_error: Option<ProviderError> = None;

        for (position, entry) in self.chain.iter().enumerate() {
            let request = self.build_request(entry, conversation, options, false, rng);
            attempts += 1;

            match try_entry(entry, &request).await {
                Ok(text) => {
                    let fell_back = position > 0;
                    if fell_back {
                        tracing::info!(
                            provider = %entry.descriptor.name,
                            "Fallback provider handled request"
                        );
                    }
                    return Ok(DispatchOutcome {
                        text,
                        provider: entry.descriptor.name.clone(),
                        model: request.model,
                        fell_back,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        provider = %entry.descriptor.name,
                        error = %err,
                        "Provider failed, trying next in chain"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(DispatchError::Exhausted {
            attempts,
            last: last_error,
        })
    }

    /// Select a provider for streaming and open its raw byte stream.
    ///
    /// Providers marked non-streaming are skipped. A failure to open the
    /// stream counts against the provider and the chain moves on; once
    /// bytes flow, mid-stream failover is not possible and errors
    /// propagate to the relay.
    pub async fn dispatch_stream(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
    ) -> Result<StreamSelection, DispatchError> {
        let mut rng = StdRng::from_os_rng();
        self.dispatch_stream_with_rng(conversation, options, &mut rng)
            .await
    }

    /// `dispatch_stream` with an injected RNG for deterministic variant picks.
    pub async fn dispatch_stream_with_rng<R: Rng>(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
        rng: &mut R,
    ) -> Result<StreamSelection, DispatchError> {
        if conversation.is_empty() {
            return Err(DispatchError::EmptyConversation);
        }

        if let Some(name) = &options.provider {
            let entry = self
                .chain
                .get(name)
                .ok_or_else(|| DispatchError::UnknownProvider(name.clone()))?;
            if !entry.descriptor.streaming {
                return Err(DispatchError::StreamingUnsupported(name.clone()));
            }
            let request = self.build_request(entry, conversation, options, true, rng);
            return match entry.backend.open_stream(&request).await {
                Ok(stream) => Ok(StreamSelection {
                    stream,
                    provider: entry.descriptor.name.clone(),
                    model: request.model,
                }),
                Err(err) => {
                    tracing::warn!(
                        provider = %entry.descriptor.name,
                        error = %err,
                        "Pinned provider failed to open stream"
                    );
                    Err(DispatchError::Exhausted {
                        attempts: 1,
                        last: Some(err),
                    })
                }
            };
        }

        let mut attempts = 0;
        let mut last_error: Option<ProviderError> = None;

        for entry in self.chain.iter() {
            if !entry.descriptor.streaming {
                tracing::debug!(
                    provider = %entry.descriptor.name,
                    "Provider does not stream, skipping"
                );
                continue;
            }

            let request = self.build_request(entry, conversation, options, true, rng);
            attempts += 1;

            match entry.backend.open_stream(&request).await {
                Ok(stream) => {
                    return Ok(StreamSelection {
                        stream,
                        provider: entry.descriptor.name.clone(),
                        model: request.model,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        provider = %entry.descriptor.name,
                        error = %err,
                        "Provider failed to open stream, trying next in chain"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(DispatchError::Exhausted {
            attempts,
            last: last_error,
        })
    }

    /// Build the upstream request for one entry: truncate history to the
    /// budget, then pick the model.
    fn build_request<R: Rng>(
        &self,
        entry: &ChainEntry,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
        stream: bool,
        rng: &mut R,
    ) -> CompletionRequest {
        let kept = truncate_to_budget(conversation, self.history_budget);
        CompletionRequest {
            model: pick_model(&entry.descriptor, options, rng),
            messages: kept.to_vec(),
            max_tokens: self.reply_max_tokens,
            temperature: Some(self.temperature),
            stream,
        }
    }
}

/// One attempt against one entry. A reply that trims to nothing counts
/// as a failure so the chain can move on.
async fn try_entry(
    entry: &ChainEntry,
    request: &CompletionRequest,
) -> Result<String, ProviderError> {
    match entry.backend.send(request).await {
        Ok(text) if text.trim().is_empty() => Err(ProviderError::EmptyReply),
        other => other,
    }
}

/// Pick the model for one attempt: an explicit override wins, then a
/// uniform draw from the descriptor's variant list, then the scalar
/// default. The draw is per-call; nothing is pinned across requests.
fn pick_model<R: Rng>(
    descriptor: &ProviderDescriptor,
    options: &DispatchOptions,
    rng: &mut R,
) -> String {
    if let Some(model) = &options.model {
        return model.clone();
    }
    if descriptor.models.is_empty() {
        descriptor.model.clone()
    } else {
        let idx = rng.random_range(0..descriptor.models.len());
        descriptor.models[idx].clone()
    }
}
