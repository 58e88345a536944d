//! HTTP/REST API layer for Solace.
//!
//! Axum-based REST API at `/api/` with the envelope response format and
//! CORS support.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
