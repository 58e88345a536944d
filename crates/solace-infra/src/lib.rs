//! Infrastructure layer for Solace.
//!
//! Implements the ports defined in `solace-core`: durable message backends
//! (SQLite, PostgREST), the OpenAI-compatible generator, configuration
//! loading, and the wiring that assembles a `TurnOrchestrator` from config.

pub mod config;
pub mod durable;
pub mod filesystem;
pub mod generation;
pub mod postgrest;
pub mod service;
pub mod sqlite;
