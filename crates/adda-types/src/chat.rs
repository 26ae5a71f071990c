//! Persisted chat records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::llm::{ChatMessage, MessageRole};

/// A stored conversation, addressed by `(user_id, id)`.
///
/// Serialized with camelCase field names to match the wire format the web
/// client exchanges. The message transcript travels as a JSON array and is
/// always replaced whole on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_record_uses_camel_case_on_the_wire() {
        let record = ChatRecord {
            id: "chat-1".to_string(),
            user_id: "user-1".to_string(),
            title: "Greetings".to_string(),
            messages: vec![ChatMessage::user("hello")],
            created_at: "2026-01-15T10:30:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn chat_record_title_defaults_empty() {
        let record: ChatRecord = serde_json::from_str(
            r#"{
                "id": "chat-1",
                "userId": "user-1",
                "messages": [],
                "createdAt": "2026-01-15T10:30:00Z"
            }"#,
        )
        .unwrap();
        assert_eq!(record.title, "");
    }
}
