//! Gateway configuration types for Adda.
//!
//! `GatewayConfig` represents the top-level `config.toml` that controls
//! the provider chain, request budgets, and command trigger tables.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderDescriptor;

/// Top-level configuration for the Adda gateway.
///
/// Loaded from `~/.adda/config.toml`. All fields have sensible defaults;
/// a missing file yields a single-provider Groq chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upstream providers, in fallback order.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderDescriptor>,

    /// Approximate token budget for conversation history sent upstream.
    #[serde(default = "default_history_budget")]
    pub history_budget: u32,

    /// `max_tokens` requested for each completion.
    #[serde(default = "default_reply_max_tokens")]
    pub reply_max_tokens: u32,

    /// Sampling temperature for completions.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Deadline for a single upstream request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Command trigger words and the city lookup table.
    #[serde(default)]
    pub commands: CommandTable,
}

fn default_providers() -> Vec<ProviderDescriptor> {
    vec![ProviderDescriptor {
        name: "groq".to_string(),
        base_url: "https://api.groq.com/openai/v1".to_string(),
        api_key_env: "GROQ_API_KEY".to_string(),
        model: "llama-3.1-8b-instant".to_string(),
        models: Vec::new(),
        streaming: true,
    }]
}

fn default_history_budget() -> u32 {
    3_000
}

fn default_reply_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f64 {
    0.7
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            history_budget: default_history_budget(),
            reply_max_tokens: default_reply_max_tokens(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            commands: CommandTable::default(),
        }
    }
}

/// Trigger words for command interception.
///
/// Triggers are matched case-insensitively as substrings of the latest user
/// message, Bengali and English alike. Detection order is fixed: weather,
/// news, book, search; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTable {
    /// City used for weather requests that name no known city.
    #[serde(default = "default_city")]
    pub default_city: String,

    #[serde(default = "default_weather_triggers")]
    pub weather_triggers: Vec<String>,

    #[serde(default = "default_news_triggers")]
    pub news_triggers: Vec<String>,

    #[serde(default = "default_book_triggers")]
    pub book_triggers: Vec<String>,

    #[serde(default = "default_search_triggers")]
    pub search_triggers: Vec<String>,

    /// City keywords recognized in weather requests, checked in order.
    #[serde(default = "default_cities")]
    pub cities: Vec<CityAlias>,

    /// Environment variable that holds the news API key.
    #[serde(default = "default_news_api_key_env")]
    pub news_api_key_env: String,
}

/// Maps a keyword found in a message to the city name sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityAlias {
    pub keyword: String,
    pub city: String,
}

impl CityAlias {
    fn new(keyword: &str, city: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            city: city.to_string(),
        }
    }
}

fn default_city() -> String {
    "Dhaka".to_string()
}

fn default_weather_triggers() -> Vec<String> {
    vec!["আবহাওয়া".to_string(), "weather".to_string()]
}

fn default_news_triggers() -> Vec<String> {
    vec![
        "খবর".to_string(),
        "সংবাদ".to_string(),
        "news".to_string(),
        "headlines".to_string(),
    ]
}

fn default_book_triggers() -> Vec<String> {
    vec!["বই".to_string(), "book".to_string()]
}

fn default_search_triggers() -> Vec<String> {
    vec![
        "খোঁজ".to_string(),
        "সার্চ".to_string(),
        "search".to_string(),
    ]
}

fn default_cities() -> Vec<CityAlias> {
    vec![
        CityAlias::new("ঢাকা", "Dhaka"),
        CityAlias::new("চট্টগ্রাম", "Chittagong"),
        CityAlias::new("খুলনা", "Khulna"),
        CityAlias::new("রাজশাহী", "Rajshahi"),
        CityAlias::new("সিলেট", "Sylhet"),
        CityAlias::new("dhaka", "Dhaka"),
        CityAlias::new("chittagong", "Chittagong"),
        CityAlias::new("khulna", "Khulna"),
        CityAlias::new("rajshahi", "Rajshahi"),
        CityAlias::new("sylhet", "Sylhet"),
    ]
}

fn default_news_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            weather_triggers: default_weather_triggers(),
            news_triggers: default_news_triggers(),
            book_triggers: default_book_triggers(),
            search_triggers: default_search_triggers(),
            cities: default_cities(),
            news_api_key_env: default_news_api_key_env(),
        }
    }
}
