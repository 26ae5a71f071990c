//! Application state wiring the gateway together.
//!
//! AppState holds the gateway (dispatcher plus command handler) and the
//! chat store used by the HTTP handlers. The provider chain is built once
//! at startup from the config file; providers whose API key env var is
//! unset are left out of the chain with a warning rather than failing
//! requests later.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use adda_core::gateway::Gateway;
use adda_core::llm::box_backend::BoxChatBackend;
use adda_core::llm::dispatch::{ChainEntry, Dispatcher, ProviderChain};
use adda_infra::command::HttpCommandHandler;
use adda_infra::config::{load_config, resolve_api_key, resolve_data_dir};
use adda_infra::llm::openai::{http_client, HttpChatBackend};
use adda_infra::sqlite::chat::SqliteChatStore;
use adda_infra::sqlite::pool::DatabasePool;
use adda_types::config::GatewayConfig;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway<HttpCommandHandler>>,
    pub store: Arc<SqliteChatStore>,
    pub config: Arc<GatewayConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB,
    /// build the provider chain.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        // Initialize database
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("adda.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        // One shared HTTP client for providers and command services
        let client = http_client()?;
        let timeout = Duration::from_secs(config.request_timeout_secs);

        let mut entries = Vec::new();
        for descriptor in &config.providers {
            match resolve_api_key(descriptor) {
                Some(api_key) => {
                    let backend = HttpChatBackend::new(
                        client.clone(),
                        descriptor.name.clone(),
                        descriptor.base_url.clone(),
                        api_key,
                        timeout,
                    );
                    entries.push(ChainEntry {
                        descriptor: descriptor.clone(),
                        backend: BoxChatBackend::new(backend),
                    });
                }
                None => {
                    tracing::warn!(
                        provider = %descriptor.name,
                        env = %descriptor.api_key_env,
                        "API key not set, provider left out of the chain"
                    );
                }
            }
        }
        if entries.is_empty() {
            tracing::warn!(
                "No provider has an API key; chat requests will fail until one is configured"
            );
        }

        let dispatcher = Dispatcher::new(ProviderChain::new(entries), &config);
        let commands = HttpCommandHandler::new(client, &config.commands);
        let gateway = Gateway::new(dispatcher, commands, config.commands.clone());
        let store = SqliteChatStore::new(db_pool.clone());

        Ok(Self {
            gateway: Arc::new(gateway),
            store: Arc::new(store),
            config: Arc::new(config),
            data_dir,
            db_pool,
        })
    }
}
