//! Sentiment provider implementations.
//!
//! Contains the remote implementations of the [`SentimentProvider`] trait
//! defined in `affect-core`, plus the [`DefaultProviderFactory`] the
//! registry uses to construct the right provider for each kind.
//!
//! [`SentimentProvider`]: affect_core::sentiment::provider::SentimentProvider

pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod remote;

use affect_core::sentiment::box_provider::BoxSentimentProvider;
use affect_core::sentiment::keyword::LocalFallbackProvider;
use affect_core::sentiment::registry::ProviderFactory;
use affect_types::error::ProviderError;
use affect_types::provider::{ProviderConfig, ProviderKind};

use self::gemini::GeminiProvider;
use self::openai::OpenAiProvider;

/// Create a [`BoxSentimentProvider`] for `kind` from its config.
///
/// Performs no I/O; availability is checked later by the analyzer.
pub fn create_provider(
    kind: ProviderKind,
    config: &ProviderConfig,
) -> Result<BoxSentimentProvider, ProviderError> {
    match kind {
        ProviderKind::OpenAi => Ok(BoxSentimentProvider::new(OpenAiProvider::new(config)?)),
        ProviderKind::Gemini => Ok(BoxSentimentProvider::new(GeminiProvider::new(config)?)),
        ProviderKind::Fallback => Ok(BoxSentimentProvider::new(LocalFallbackProvider::new(config))),
    }
}

/// The production [`ProviderFactory`]: real HTTP providers plus the
/// keyword fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProviderFactory;

impl ProviderFactory for DefaultProviderFactory {
    fn create(
        &self,
        kind: ProviderKind,
        config: &ProviderConfig,
    ) -> Result<BoxSentimentProvider, ProviderError> {
        create_provider(kind, config)
    }
}
