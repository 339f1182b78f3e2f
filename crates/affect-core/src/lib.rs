//! Sentiment scoring business logic for Affect.
//!
//! This crate defines the provider trait that concrete backends implement,
//! the retry/timeout/parsing primitives they share, the offline keyword
//! fallback, and the chain orchestration. It depends only on
//! `affect-types` -- never on `affect-infra` or any HTTP crate.

pub mod sentiment;
