//! Dispatch engine and port definitions for Adda.
//!
//! This crate holds the gateway's business logic: command interception,
//! token-budget truncation of conversation history, the ordered provider
//! fallback chain, the stream relay, and the gateway front door that
//! composes them per request. It defines the "ports" (backend, command
//! handler, and store traits) that the infrastructure layer implements.
//! It depends only on `adda-types` -- never on `adda-infra` or any
//! HTTP/database crate.

pub mod command;
pub mod gateway;
pub mod llm;
pub mod relay;
pub mod store;
