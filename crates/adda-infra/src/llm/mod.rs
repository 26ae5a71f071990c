//! Upstream provider implementations.

pub mod openai;
