//! Conversation core for Solace.
//!
//! This crate defines the "ports" that the infrastructure layer implements
//! (`DurableBackend`, `Generator`) and the two components built on them:
//! the `SessionMessageStore` facade and the `TurnOrchestrator`. It never
//! depends on `solace-infra` or any database/HTTP crate.

pub mod generation;
pub mod store;
pub mod turn;

#[cfg(test)]
pub(crate) mod testing;
