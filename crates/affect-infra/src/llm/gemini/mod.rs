//! Google Gemini `generateContent` sentiment provider.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`SentimentProvider`](affect_core::sentiment::provider::SentimentProvider)
//! trait against the Gemini REST API with the Vietnamese prompt.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
