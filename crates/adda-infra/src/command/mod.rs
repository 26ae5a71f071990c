//! HTTP-backed command services.
//!
//! Each intercepted command maps to one public HTTP API: wttr.in for
//! weather, NewsAPI for headlines, Open Library for books, and DuckDuckGo
//! Instant Answers for search. A command failure is terminal for its
//! request; it is never retried against the provider chain.

mod book;
mod news;
mod search;
mod weather;

use std::time::Duration;

use secrecy::SecretString;

use adda_core::command::handler::CommandHandler;
use adda_types::command::Command;
use adda_types::config::CommandTable;
use adda_types::error::CommandError;

/// Deadline for one command-service request.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(15);

/// Executes intercepted commands against their public HTTP services.
pub struct HttpCommandHandler {
    client: reqwest::Client,
    news_api_key: Option<SecretString>,
    news_key_env: String,
}

impl HttpCommandHandler {
    /// Build a handler. The news API key is resolved once from the
    /// environment variable named in `table`; the other services need no
    /// credentials.
    pub fn new(client: reqwest::Client, table: &CommandTable) -> Self {
        let news_api_key = match std::env::var(&table.news_api_key_env) {
            Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
            _ => None,
        };
        Self {
            client,
            news_api_key,
            news_key_env: table.news_api_key_env.clone(),
        }
    }
}

impl CommandHandler for HttpCommandHandler {
    async fn run(&self, command: &Command) -> Result<String, CommandError> {
        tracing::debug!(kind = command.kind(), "Running intercepted command");
        match command {
            Command::Weather { city } => weather::current(&self.client, city).await,
            Command::News => {
                news::headlines(&self.client, self.news_api_key.as_ref(), &self.news_key_env).await
            }
            Command::Book { query } => book::lookup(&self.client, query).await,
            Command::Search { query } => search::instant_answer(&self.client, query).await,
        }
    }
}
