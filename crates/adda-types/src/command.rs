//! Commands intercepted from user messages.
//!
//! A command detected in the latest user turn is handled locally by the
//! gateway; the provider chain is never invoked for it.

use serde::{Deserialize, Serialize};

/// A command detected in the latest user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Command {
    /// Current weather for a city.
    Weather { city: String },
    /// Top news headlines.
    News,
    /// Book lookup by title or author.
    Book { query: String },
    /// Web search via instant answers.
    Search { query: String },
}

impl Command {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Weather { .. } => "weather",
            Command::News => "news",
            Command::Book { .. } => "book",
            Command::Search { .. } => "search",
        }
    }
}
