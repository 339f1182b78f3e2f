//! Sentiment provider abstractions and chain orchestration.
//!
//! - `SentimentProvider`: RPITIT trait for concrete provider implementations
//! - `BoxSentimentProvider`: object-safe wrapper for dynamic dispatch
//! - `ProviderRegistry`: process-lifetime memoization of provider instances
//! - `SentimentAnalyzer`: first-fit walk over the provider chain

pub mod analyzer;
pub mod box_provider;
pub mod config;
pub mod keyword;
pub mod parse;
pub mod provider;
pub mod registry;
pub mod resilience;
