//! Infrastructure layer for Affect.
//!
//! Contains the remote implementations of the `SentimentProvider` trait
//! defined in `affect-core` (OpenAI and Gemini over HTTP), the default
//! provider factory, and configuration loading from the environment and
//! `affect.toml`.

pub mod config;
pub mod llm;
