//! BoxSentimentProvider -- object-safe dynamic dispatch wrapper for SentimentProvider.
//!
//! 1. Define an object-safe `SentimentProviderDyn` trait with boxed futures
//! 2. Blanket-impl `SentimentProviderDyn` for all `T: SentimentProvider`
//! 3. `BoxSentimentProvider` wraps `Box<dyn SentimentProviderDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use affect_types::error::ProviderError;
use affect_types::provider::ProviderKind;
use affect_types::sentiment::{AnalysisContext, SentimentScore};

use super::provider::SentimentProvider;

/// Object-safe version of [`SentimentProvider`] with boxed futures.
pub trait SentimentProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ProviderKind;

    fn is_available_boxed<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

    fn analyze_sentiment_boxed<'a>(
        &'a self,
        context: &'a AnalysisContext,
    ) -> Pin<Box<dyn Future<Output = Result<SentimentScore, ProviderError>> + Send + 'a>>;
}

impl<T: SentimentProvider> SentimentProviderDyn for T {
    fn name(&self) -> &str {
        SentimentProvider::name(self)
    }

    fn kind(&self) -> ProviderKind {
        SentimentProvider::kind(self)
    }

    fn is_available_boxed<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(self.is_available())
    }

    fn analyze_sentiment_boxed<'a>(
        &'a self,
        context: &'a AnalysisContext,
    ) -> Pin<Box<dyn Future<Output = Result<SentimentScore, ProviderError>> + Send + 'a>> {
        Box::pin(self.analyze_sentiment(context))
    }
}

/// Type-erased sentiment provider for runtime provider selection.
///
/// Since `SentimentProvider` uses RPITIT, it cannot be used as a trait
/// object directly. `BoxSentimentProvider` provides equivalent methods that
/// delegate to the inner `SentimentProviderDyn` trait object.
pub struct BoxSentimentProvider {
    inner: Box<dyn SentimentProviderDyn + Send + Sync>,
}

impl BoxSentimentProvider {
    /// Wrap a concrete `SentimentProvider` in a type-erased box.
    pub fn new<T: SentimentProvider + 'static>(provider: T) -> Self {
        Self {
            inner: Box::new(provider),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    pub async fn is_available(&self) -> bool {
        self.inner.is_available_boxed().await
    }

    pub async fn analyze_sentiment(
        &self,
        context: &AnalysisContext,
    ) -> Result<SentimentScore, ProviderError> {
        self.inner.analyze_sentiment_boxed(context).await
    }
}

impl std::fmt::Debug for BoxSentimentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxSentimentProvider")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
