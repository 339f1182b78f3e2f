//! HTTP/REST API layer for Affect.
//!
//! Axum-based REST API at `/api/` with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod router;
