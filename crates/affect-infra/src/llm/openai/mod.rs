//! OpenAI chat-completions sentiment provider.
//!
//! This module provides the [`OpenAiProvider`] which implements the
//! [`SentimentProvider`](affect_core::sentiment::provider::SentimentProvider)
//! trait against `/chat/completions`, with a `/models` probe for availability.

pub mod client;
pub mod types;

pub use client::OpenAiProvider;
