//! Message persistence for Solace.
//!
//! - `DurableBackend`: RPITIT port implemented by the infra adapters
//! - `BoxDurableBackend`: object-safe wrapper for runtime adapter selection
//! - `EphemeralStore`: in-process, lock-guarded fallback store
//! - `SessionMessageStore`: facade choosing between the two

pub mod box_durable;
pub mod durable;
pub mod ephemeral;
pub mod session;
