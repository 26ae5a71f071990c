//! Chat record HTTP handlers.
//!
//! Endpoints:
//! - POST /api/chats                     - Insert or replace a chat record
//! - GET  /api/chats/{user_id}           - List a user's chats, newest first
//! - GET  /api/chats/{user_id}/{chat_id} - Fetch one chat or 404

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use adda_core::store::ChatStore;
use adda_types::chat::{ChatMessage, ChatRecord};
use adda_types::error::StoreError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for saving a chat. A missing id gets a fresh UUID so the
/// client creates and updates through the same call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertChatRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/chats - insert or replace a chat record.
pub async fn upsert_chat(
    State(state): State<AppState>,
    Json(body): Json<UpsertChatRequest>,
) -> Result<Json<ChatRecord>, AppError> {
    if body.user_id.trim().is_empty() {
        return Err(AppError::Validation("userId must not be empty".to_string()));
    }

    let record = ChatRecord {
        id: body.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
        user_id: body.user_id,
        title: body.title,
        messages: body.messages,
        created_at: Utc::now(),
    };

    state.store.upsert(&record).await?;
    Ok(Json(record))
}

/// GET /api/chats/{user_id} - list a user's chats, newest first.
pub async fn list_chats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ChatRecord>>, AppError> {
    let records = state.store.list_for_user(&user_id).await?;
    Ok(Json(records))
}

/// GET /api/chats/{user_id}/{chat_id} - fetch one chat.
pub async fn get_chat(
    State(state): State<AppState>,
    Path((user_id, chat_id)): Path<(String, String)>,
) -> Result<Json<ChatRecord>, AppError> {
    let record = state
        .store
        .get(&user_id, &chat_id)
        .await?
        .ok_or(AppError::Store(StoreError::NotFound))?;
    Ok(Json(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_body_uses_camel_case_and_optional_id() {
        let body: UpsertChatRequest = serde_json::from_str(
            r#"{
                "userId": "user-1",
                "messages": [{"role": "user", "content": "hello"}]
            }"#,
        )
        .unwrap();

        assert!(body.id.is_none());
        assert_eq!(body.user_id, "user-1");
        assert_eq!(body.title, "");
        assert_eq!(body.messages.len(), 1);
    }

    #[test]
    fn upsert_body_keeps_a_client_supplied_id() {
        let body: UpsertChatRequest = serde_json::from_str(
            r#"{
                "id": "chat-7",
                "userId": "user-1",
                "title": "Weather talk",
                "messages": []
            }"#,
        )
        .unwrap();

        assert_eq!(body.id.as_deref(), Some("chat-7"));
        assert_eq!(body.title, "Weather talk");
    }
}
