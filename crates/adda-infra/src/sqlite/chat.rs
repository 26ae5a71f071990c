//! SQLite chat store implementation.
//!
//! Implements `ChatStore` from `adda-core` using sqlx with split read/write
//! pools: raw queries, a private Row struct, writer for upserts, reader for
//! lookups. The message transcript is stored as one JSON text column and
//! replaced whole on every save.

use adda_core::store::ChatStore;
use adda_types::chat::ChatRecord;
use adda_types::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ChatStore`.
pub struct SqliteChatStore {
    pool: DatabasePool,
}

impl SqliteChatStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ChatRecordRow {
    id: String,
    user_id: String,
    title: String,
    messages: String,
    created_at: String,
}

impl ChatRecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            messages: row.try_get("messages")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<ChatRecord, StoreError> {
        let messages = serde_json::from_str(&self.messages)
            .map_err(|e| StoreError::Query(format!("invalid messages payload: {e}")))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatRecord {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            messages,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ChatStore implementation
// ---------------------------------------------------------------------------

impl ChatStore for SqliteChatStore {
    async fn upsert(&self, record: &ChatRecord) -> Result<(), StoreError> {
        let messages = serde_json::to_string(&record.messages)
            .map_err(|e| StoreError::Query(e.to_string()))?;

        sqlx::query(
            r#"INSERT INTO chats (id, user_id, title, messages, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   user_id = excluded.user_id,
                   title = excluded.title,
                   messages = excluded.messages,
                   created_at = excluded.created_at"#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.title)
        .bind(messages)
        .bind(format_datetime(&record.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ChatRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM chats WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let record_row =
                ChatRecordRow::from_row(row).map_err(|e| StoreError::Query(e.to_string()))?;
            records.push(record_row.into_record()?);
        }

        Ok(records)
    }

    async fn get(&self, user_id: &str, chat_id: &str) -> Result<Option<ChatRecord>, StoreError> {
        let row = sqlx::query("SELECT * FROM chats WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(chat_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let record_row =
                    ChatRecordRow::from_row(&row).map_err(|e| StoreError::Query(e.to_string()))?;
                Ok(Some(record_row.into_record()?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adda_types::chat::ChatMessage;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_record(id: &str, user_id: &str) -> ChatRecord {
        ChatRecord {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Test chat".to_string(),
            messages: vec![
                ChatMessage::user("hello"),
                ChatMessage::assistant("hi there"),
            ],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get_roundtrip() {
        let pool = test_pool().await;
        let store = SqliteChatStore::new(pool);

        let record = make_record("chat-1", "user-1");
        store.upsert(&record).await.unwrap();

        let found = store.get("user-1", "chat-1").await.unwrap().unwrap();
        assert_eq!(found.id, "chat-1");
        assert_eq!(found.title, "Test chat");
        assert_eq!(found.messages.len(), 2);
        assert_eq!(found.messages[0].content, "hello");
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_record() {
        let pool = test_pool().await;
        let store = SqliteChatStore::new(pool);

        let mut record = make_record("chat-1", "user-1");
        store.upsert(&record).await.unwrap();

        record.title = "Renamed".to_string();
        record.messages.push(ChatMessage::user("and another thing"));
        store.upsert(&record).await.unwrap();

        let all = store.list_for_user("user-1").await.unwrap();
        assert_eq!(all.len(), 1, "second upsert must not create a new row");
        assert_eq!(all[0].title, "Renamed");
        assert_eq!(all[0].messages.len(), 3);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = test_pool().await;
        let store = SqliteChatStore::new(pool);

        let mut old = make_record("chat-old", "user-1");
        old.created_at = "2026-01-01T00:00:00Z".parse().unwrap();
        let mut new = make_record("chat-new", "user-1");
        new.created_at = "2026-02-01T00:00:00Z".parse().unwrap();

        store.upsert(&old).await.unwrap();
        store.upsert(&new).await.unwrap();

        let all = store.list_for_user("user-1").await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, "chat-new");
        assert_eq!(all[1].id, "chat-old");
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = test_pool().await;
        let store = SqliteChatStore::new(pool);

        let found = store.get("user-1", "no-such-chat").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_records_are_scoped_to_their_user() {
        let pool = test_pool().await;
        let store = SqliteChatStore::new(pool);

        store.upsert(&make_record("chat-1", "alice")).await.unwrap();
        store.upsert(&make_record("chat-2", "bob")).await.unwrap();

        let alice = store.list_for_user("alice").await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, "chat-1");

        // A chat id that exists but belongs to someone else is not visible
        let cross = store.get("alice", "chat-2").await.unwrap();
        assert!(cross.is_none());
    }
}
