//! Gateway front door: one decision per chat request.
//!
//! Composes the command interceptor and the dispatcher: when the newest
//! user turn carries a command trigger, the command handler answers and
//! the provider chain is never consulted; otherwise the conversation
//! goes to the dispatcher, as a completion or an opened stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use adda_types::config::CommandTable;
use adda_types::error::{CommandError, DispatchError};
use adda_types::llm::ChatMessage;

use crate::command;
use crate::command::handler::CommandHandler;
use crate::llm::dispatch::{DispatchOptions, DispatchOutcome, Dispatcher, StreamSelection};

/// How one request was answered.
#[derive(Debug)]
pub enum GatewayReply {
    /// A command was intercepted and handled locally. Always a complete
    /// reply, even when the caller asked for a stream.
    Command { kind: &'static str, text: String },
    /// A provider completed the conversation.
    Completion(DispatchOutcome),
    /// A provider stream was opened for relaying.
    Stream(StreamSelection),
}

/// Errors from answering one request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The intercepted command's handler failed. Final for the request;
    /// never retried against the provider chain.
    #[error("command failed: {0}")]
    Command(#[from] CommandError),

    /// The provider chain rejected or exhausted the request.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

/// One front door for chat requests.
///
/// Generic over the [`CommandHandler`] port so the composition lives in
/// core without depending on the HTTP implementations in adda-infra.
pub struct Gateway<H: CommandHandler> {
    dispatcher: Dispatcher,
    commands: H,
    table: CommandTable,
}

impl<H: CommandHandler> Gateway<H> {
    pub fn new(dispatcher: Dispatcher, commands: H, table: CommandTable) -> Self {
        Self {
            dispatcher,
            commands,
            table,
        }
    }

    /// Access the dispatcher (chain inspection).
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Answer one conversation: an intercepted command, a completion, or
    /// an opened stream.
    pub async fn respond(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
        stream: bool,
    ) -> Result<GatewayReply, GatewayError> {
        let mut rng = StdRng::from_os_rng();
        self.respond_with_rng(conversation, options, stream, &mut rng)
            .await
    }

    /// `respond` with an injected RNG for deterministic variant picks.
    pub async fn respond_with_rng<R: Rng>(
        &self,
        conversation: &[ChatMessage],
        options: &DispatchOptions,
        stream: bool,
        rng: &mut R,
    ) -> Result<GatewayReply, GatewayError> {
        if let Some(cmd) = command::intercept(conversation, &self.table) {
            tracing::info!(kind = cmd.kind(), "Command intercepted");
            let text = self.commands.run(&cmd).await?;
            return Ok(GatewayReply::Command {
                kind: cmd.kind(),
                text,
            });
        }

        if stream {
            let selection = self
                .dispatcher
                .dispatch_stream_with_rng(conversation, options, rng)
                .await?;
            Ok(GatewayReply::Stream(selection))
        } else {
            let outcome = self
                .dispatcher
                .dispatch_with_rng(conversation, options, rng)
                .await?;
            Ok(GatewayReply::Completion(outcome))
        }
    }
}
