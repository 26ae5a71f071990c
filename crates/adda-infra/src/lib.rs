//! Infrastructure layer for Adda.
//!
//! Contains implementations of the port traits defined in `adda-core`:
//! SQLite chat storage, the HTTP provider backend, and the HTTP-backed
//! command services (weather, news, books, search).

pub mod command;
pub mod config;
pub mod llm;
pub mod sqlite;
