//! Shared domain types for Affect.
//!
//! This crate contains the data shapes exchanged between the sentiment
//! analyzer, its providers, and the outer surfaces (CLI, HTTP):
//! analysis requests, normalized scores, provider configuration, and the
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod error;
pub mod provider;
pub mod sentiment;
