//! Application state wiring the analyzer together.
//!
//! AppState holds the analyzer used by both CLI commands and REST API
//! handlers. The provider registry inside it is shared by every clone, so
//! each provider is constructed at most once per process.

use std::path::Path;
use std::sync::Arc;

use affect_core::sentiment::analyzer::SentimentAnalyzer;
use affect_core::sentiment::config::ProviderConfigs;
use affect_core::sentiment::registry::ProviderRegistry;
use affect_infra::llm::DefaultProviderFactory;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: SentimentAnalyzer,
    pub configs: Arc<ProviderConfigs>,
}

impl AppState {
    /// Load provider configuration (file, then environment) and wire the analyzer.
    pub async fn init(config_path: &Path) -> Self {
        let configs = affect_infra::config::load(config_path).await;
        Self::from_configs(configs)
    }

    pub fn from_configs(configs: ProviderConfigs) -> Self {
        let configs = Arc::new(configs);
        let registry = Arc::new(ProviderRegistry::new(DefaultProviderFactory));
        let analyzer = SentimentAnalyzer::new(registry, Arc::clone(&configs));

        tracing::debug!(chain = ?configs.chain(), "Analyzer initialized");

        Self { analyzer, configs }
    }
}
