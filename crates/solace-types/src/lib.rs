//! Shared domain types for Solace.
//!
//! This crate contains the types passed between the conversation core, the
//! storage/generation adapters and the outer API: messages, history entries,
//! service configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod message;
