//! Upstream provider abstractions for Adda.
//!
//! This module defines the core traits and machinery for provider integration:
//! - `ChatBackend`: RPITIT trait for concrete provider implementations
//! - `BoxChatBackend`: Object-safe wrapper for dynamic dispatch
//! - `Dispatcher`: ordered fallback chain with history truncation

pub mod backend;
pub mod box_backend;
pub mod dispatch;
pub mod truncate;
