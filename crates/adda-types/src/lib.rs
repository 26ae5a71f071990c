//! Shared domain types for Adda.
//!
//! This crate contains the core domain types used across the Adda gateway:
//! chat messages, provider descriptors, intercepted commands, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod command;
pub mod config;
pub mod error;
pub mod llm;
