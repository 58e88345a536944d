//! SQLite storage layer.
//!
//! Durable message backend on SQLite with WAL mode and split read/write
//! connection pools.

pub mod message;
pub mod pool;
