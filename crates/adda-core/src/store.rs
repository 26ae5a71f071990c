//! Chat record storage port.

use adda_types::chat::ChatRecord;
use adda_types::error::StoreError;

/// Repository for persisted chat records.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). The
/// SQLite implementation lives in adda-infra.
pub trait ChatStore: Send + Sync {
    /// Insert or replace a record, keyed by `record.id`.
    fn upsert(
        &self,
        record: &ChatRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// All records belonging to one user, newest first.
    fn list_for_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ChatRecord>, StoreError>> + Send;

    /// Fetch one record scoped to its owner.
    ///
    /// Returns `Ok(None)` when no such chat exists for this user.
    fn get(
        &self,
        user_id: &str,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatRecord>, StoreError>> + Send;
}
