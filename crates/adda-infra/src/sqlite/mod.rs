//! SQLite persistence: split read/write pool and the chat store.

pub mod chat;
pub mod pool;
