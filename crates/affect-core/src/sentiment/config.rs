//! The full provider configuration set and chain order.

use affect_types::provider::{ProviderConfig, ProviderKind};

/// Default chain: OpenAI -> Gemini -> offline fallback.
pub const DEFAULT_CHAIN: [ProviderKind; 3] = ProviderKind::ALL;

/// One [`ProviderConfig`] per provider kind, plus the chain order.
///
/// Built once at process start (see `affect_infra::config`) and shared
/// read-only by the analyzer.
#[derive(Debug, Clone)]
pub struct ProviderConfigs {
    pub openai: ProviderConfig,
    pub gemini: ProviderConfig,
    pub fallback: ProviderConfig,
    chain: Vec<ProviderKind>,
}

impl ProviderConfigs {
    /// Remote providers disabled, fallback enabled, default chain.
    pub fn new() -> Self {
        Self {
            openai: ProviderConfig::new("OpenAI"),
            gemini: ProviderConfig::new("Gemini"),
            fallback: fallback_defaults(),
            chain: DEFAULT_CHAIN.to_vec(),
        }
    }

    /// Config for the given kind.
    pub fn get(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Fallback => &self.fallback,
        }
    }

    /// Replace the config for the given kind.
    ///
    /// The fallback provider cannot be disabled.
    pub fn set(&mut self, kind: ProviderKind, config: ProviderConfig) {
        match kind {
            ProviderKind::OpenAi => self.openai = config,
            ProviderKind::Gemini => self.gemini = config,
            ProviderKind::Fallback => self.fallback = config.enabled(true),
        }
    }

    pub fn with(mut self, kind: ProviderKind, config: ProviderConfig) -> Self {
        self.set(kind, config);
        self
    }

    /// Override the chain order. Duplicate entries are dropped.
    pub fn with_chain(mut self, chain: impl IntoIterator<Item = ProviderKind>) -> Self {
        let mut deduped = Vec::new();
        for kind in chain {
            if !deduped.contains(&kind) {
                deduped.push(kind);
            }
        }
        if !deduped.contains(&ProviderKind::Fallback) {
            tracing::warn!(
                chain = ?deduped,
                "Provider chain has no fallback entry; analysis can fail when remote providers are down"
            );
        }
        self.chain = deduped;
        self
    }

    pub fn chain(&self) -> &[ProviderKind] {
        &self.chain
    }
}

impl Default for ProviderConfigs {
    fn default() -> Self {
        Self::new()
    }
}

/// The offline fallback: always enabled, 1 s timeout, single attempt.
pub fn fallback_defaults() -> ProviderConfig {
    ProviderConfig::new("Fallback")
        .enabled(true)
        .with_timeout_ms(1_000)
        .with_max_retries(1)
}
