//! SentimentProvider trait definition.
//!
//! This is the core abstraction that every scoring backend implements.
//! Capabilities are a flat set (`name`, `is_available`, `analyze_sentiment`);
//! shared behavior lives in free functions in [`super::resilience`] and
//! [`super::parse`] rather than in a base type.

use std::future::Future;

use affect_types::error::ProviderError;
use affect_types::provider::ProviderKind;
use affect_types::sentiment::{AnalysisContext, SentimentScore};

/// Trait for sentiment scoring backends (remote LLMs, local heuristics).
///
/// Uses native async fn in traits (RPITIT). Implementations live in
/// `affect-infra` (remote) and [`super::keyword`] (offline fallback).
pub trait SentimentProvider: Send + Sync {
    /// Display name reported in `SentimentScore.provider` (e.g., "OpenAI").
    fn name(&self) -> &str;

    /// The provider-type tag this instance was built for.
    fn kind(&self) -> ProviderKind;

    /// Whether the provider can take a request right now.
    ///
    /// Must never fail: any probe error is reported as `false`.
    fn is_available(&self) -> impl Future<Output = bool> + Send;

    /// Score a single answer.
    fn analyze_sentiment(
        &self,
        context: &AnalysisContext,
    ) -> impl Future<Output = Result<SentimentScore, ProviderError>> + Send;
}
