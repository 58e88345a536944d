//! Reply generation abstractions for Solace.
//!
//! - `Generator`: RPITIT port implemented by the infra adapters
//! - `BoxGenerator`: object-safe wrapper for runtime adapter selection
//! - `StaticGenerator`: fixed-reply generator for offline use
//! - `prompt`: system prompt and history-to-prompt mapping

pub mod box_generator;
pub mod generator;
pub mod prompt;
pub mod static_reply;
