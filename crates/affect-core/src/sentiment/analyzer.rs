//! First-fit sentiment analysis over a prioritized provider chain.
//!
//! For each request the chain is walked strictly in order: disabled
//! providers are skipped without being instantiated, unavailable ones are
//! skipped after the availability check, and the first provider that
//! returns a score wins. Provider errors are logged and swallowed; only
//! exhausting the whole chain is reported to the caller.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::Instrument;

use affect_types::error::AnalyzerError;
use affect_types::provider::{ProviderKind, ProviderStatus};
use affect_types::sentiment::{AnalysisContext, SentimentScore};

use super::config::ProviderConfigs;
use super::registry::ProviderRegistry;

/// Orchestrates the provider chain.
///
/// Owns only the ordered list of provider kinds; provider instances are
/// owned by the shared [`ProviderRegistry`].
#[derive(Clone)]
pub struct SentimentAnalyzer {
    registry: Arc<ProviderRegistry>,
    configs: Arc<ProviderConfigs>,
    chain: Vec<ProviderKind>,
}

impl SentimentAnalyzer {
    /// Create an analyzer using the chain order from `configs`.
    pub fn new(registry: Arc<ProviderRegistry>, configs: Arc<ProviderConfigs>) -> Self {
        let chain = configs.chain().to_vec();
        Self {
            registry,
            configs,
            chain,
        }
    }

    /// Override the chain order for this analyzer.
    pub fn with_chain(mut self, chain: Vec<ProviderKind>) -> Self {
        self.chain = chain;
        self
    }

    pub fn chain(&self) -> &[ProviderKind] {
        &self.chain
    }

    /// Score one answer.
    ///
    /// Never returns a partial result: either the first successful
    /// provider's score, or [`AnalyzerError::AllProvidersFailed`] when every
    /// chain entry was skipped or failed.
    pub async fn analyze(&self, context: &AnalysisContext) -> Result<SentimentScore, AnalyzerError> {
        let span = tracing::info_span!("analyze", question_id = context.question_id);
        self.run_chain(context).instrument(span).await
    }

    async fn run_chain(&self, context: &AnalysisContext) -> Result<SentimentScore, AnalyzerError> {
        let mut attempted = Vec::new();

        for &kind in &self.chain {
            let config = self.configs.get(kind);
            if !config.enabled {
                tracing::debug!(%kind, "Provider disabled, skipping");
                continue;
            }

            let provider = match self.registry.get(kind, config) {
                Ok(provider) => provider,
                Err(err) => {
                    tracing::warn!(%kind, error = %err, "Provider construction failed, trying next in chain");
                    attempted.push(kind.to_string());
                    continue;
                }
            };

            if !provider.is_available().await {
                tracing::debug!(%kind, provider = %provider.name(), "Provider unavailable, skipping");
                continue;
            }

            attempted.push(kind.to_string());
            tracing::debug!(%kind, provider = %provider.name(), "Trying provider");

            match provider.analyze_sentiment(context).await {
                Ok(score) => {
                    tracing::info!(
                        %kind,
                        provider = %provider.name(),
                        score = score.score.as_u8(),
                        source = %score.source,
                        "Sentiment analyzed"
                    );
                    return Ok(score);
                }
                Err(err) => {
                    tracing::warn!(
                        %kind,
                        provider = %provider.name(),
                        error = %err,
                        "Provider failed, trying next in chain"
                    );
                }
            }
        }

        tracing::error!(?attempted, "All providers in chain failed or were unavailable");
        Err(AnalyzerError::AllProvidersFailed { attempted })
    }

    /// Score many answers concurrently.
    ///
    /// Results correspond 1:1 to `contexts` by position. Fails if any single
    /// analysis exhausts the chain.
    pub async fn analyze_batch(
        &self,
        contexts: &[AnalysisContext],
    ) -> Result<Vec<SentimentScore>, AnalyzerError> {
        join_all(contexts.iter().map(|ctx| self.analyze(ctx)))
            .await
            .into_iter()
            .collect()
    }

    /// Enabled/available state of each chain entry.
    ///
    /// Disabled providers are reported without being instantiated.
    pub async fn provider_statuses(&self) -> Vec<ProviderStatus> {
        let mut statuses = Vec::with_capacity(self.chain.len());

        for &kind in &self.chain {
            let config = self.configs.get(kind);
            let available = if config.enabled {
                match self.registry.get(kind, config) {
                    Ok(provider) => provider.is_available().await,
                    Err(_) => false,
                }
            } else {
                false
            };

            statuses.push(ProviderStatus {
                kind,
                name: config.name.clone(),
                enabled: config.enabled,
                available,
            });
        }

        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use affect_types::error::ProviderError;
    use affect_types::provider::ProviderConfig;
    use affect_types::sentiment::{ScoreSource, SentimentLabel};

    use crate::sentiment::box_provider::BoxSentimentProvider;
    use crate::sentiment::keyword::LocalFallbackProvider;
    use crate::sentiment::provider::SentimentProvider;
    use crate::sentiment::registry::ProviderFactory;

    // --- Mock providers ---

    #[derive(Clone, Copy)]
    enum Outcome {
        Succeed(SentimentLabel),
        Fail,
    }

    #[derive(Clone, Copy)]
    struct Script {
        available: bool,
        outcome: Outcome,
    }

    struct ScriptedProvider {
        name: String,
        kind: ProviderKind,
        script: Script,
        calls: Arc<AtomicU32>,
    }

    impl SentimentProvider for ScriptedProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn is_available(&self) -> bool {
            self.script.available
        }

        async fn analyze_sentiment(
            &self,
            _context: &AnalysisContext,
        ) -> Result<SentimentScore, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.script.outcome {
                Outcome::Succeed(label) => Ok(SentimentScore::new(label, &self.name, ScoreSource::Llm)),
                Outcome::Fail => Err(ProviderError::Http {
                    status: 500,
                    body: "boom".into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedFactory {
        scripts: HashMap<ProviderKind, Script>,
        calls: HashMap<ProviderKind, Arc<AtomicU32>>,
    }

    impl ScriptedFactory {
        fn script(mut self, kind: ProviderKind, available: bool, outcome: Outcome) -> Self {
            self.scripts.insert(kind, Script { available, outcome });
            self.calls.insert(kind, Arc::new(AtomicU32::new(0)));
            self
        }

        fn counter(&self, kind: ProviderKind) -> Arc<AtomicU32> {
            Arc::clone(&self.calls[&kind])
        }
    }

    impl ProviderFactory for ScriptedFactory {
        fn create(
            &self,
            kind: ProviderKind,
            config: &ProviderConfig,
        ) -> Result<BoxSentimentProvider, ProviderError> {
            match self.scripts.get(&kind) {
                Some(script) => Ok(BoxSentimentProvider::new(ScriptedProvider {
                    name: config.name.clone(),
                    kind,
                    script: *script,
                    calls: Arc::clone(&self.calls[&kind]),
                })),
                None => Ok(BoxSentimentProvider::new(LocalFallbackProvider::new(config))),
            }
        }
    }

    fn enabled_configs() -> ProviderConfigs {
        ProviderConfigs::default()
            .with(ProviderKind::OpenAi, ProviderConfig::new("OpenAI").enabled(true))
            .with(ProviderKind::Gemini, ProviderConfig::new("Gemini").enabled(true))
    }

    fn analyzer(factory: ScriptedFactory, configs: ProviderConfigs) -> (SentimentAnalyzer, Arc<ProviderRegistry>) {
        let registry = Arc::new(ProviderRegistry::new(factory));
        let analyzer = SentimentAnalyzer::new(Arc::clone(&registry), Arc::new(configs));
        (analyzer, registry)
    }

    fn family_context() -> AnalysisContext {
        AnalysisContext::new(
            1,
            "Bạn cảm thấy thế nào về gia đình?",
            "Con rất vui và yêu gia đình",
            Some("Gia đình".into()),
        )
        .unwrap()
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_remote_disabled_uses_fallback() {
        let (analyzer, registry) = analyzer(ScriptedFactory::default(), ProviderConfigs::default());

        let score = analyzer.analyze(&family_context()).await.unwrap();

        assert_eq!(score.score, SentimentLabel::Positive);
        assert_eq!(score.source, ScoreSource::Fallback);
        assert_eq!(score.provider, "Fallback");
        // Disabled providers are never instantiated
        assert!(!registry.contains(ProviderKind::OpenAi));
        assert!(!registry.contains(ProviderKind::Gemini));
    }

    #[tokio::test]
    async fn test_first_fit_stops_after_success() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, true, Outcome::Succeed(SentimentLabel::Neutral))
            .script(ProviderKind::Gemini, true, Outcome::Succeed(SentimentLabel::Negative));
        let openai_calls = factory.counter(ProviderKind::OpenAi);
        let gemini_calls = factory.counter(ProviderKind::Gemini);
        let (analyzer, registry) = analyzer(factory, enabled_configs());

        let score = analyzer.analyze(&family_context()).await.unwrap();

        assert_eq!(score.provider, "OpenAI");
        assert_eq!(score.score, SentimentLabel::Neutral);
        assert_eq!(openai_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gemini_calls.load(Ordering::SeqCst), 0);
        assert!(!registry.contains(ProviderKind::Gemini));
    }

    #[tokio::test]
    async fn test_failure_falls_through_to_next() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, true, Outcome::Fail)
            .script(ProviderKind::Gemini, true, Outcome::Succeed(SentimentLabel::Negative));
        let openai_calls = factory.counter(ProviderKind::OpenAi);
        let (analyzer, _) = analyzer(factory, enabled_configs());

        let score = analyzer.analyze(&family_context()).await.unwrap();

        assert_eq!(score.provider, "Gemini");
        assert_eq!(score.score, SentimentLabel::Negative);
        // Failed provider is not retried by the analyzer
        assert_eq!(openai_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_skipped() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, false, Outcome::Succeed(SentimentLabel::Neutral))
            .script(ProviderKind::Gemini, false, Outcome::Succeed(SentimentLabel::Neutral));
        let openai_calls = factory.counter(ProviderKind::OpenAi);
        let (analyzer, _) = analyzer(factory, enabled_configs());

        let score = analyzer.analyze(&family_context()).await.unwrap();

        assert_eq!(score.source, ScoreSource::Fallback);
        assert_eq!(openai_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_failed_without_fallback_is_fatal() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, true, Outcome::Fail)
            .script(ProviderKind::Gemini, true, Outcome::Fail);
        let (analyzer, _) = analyzer(factory, enabled_configs());
        let analyzer = analyzer.with_chain(vec![ProviderKind::OpenAi, ProviderKind::Gemini]);

        let err = analyzer.analyze(&family_context()).await.unwrap_err();

        match err {
            AnalyzerError::AllProvidersFailed { attempted } => {
                assert_eq!(attempted, vec!["openai".to_string(), "gemini".to_string()]);
            }
            other => panic!("Expected AllProvidersFailed, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_chain_is_fatal() {
        let (analyzer, _) = analyzer(ScriptedFactory::default(), ProviderConfigs::default());
        let analyzer = analyzer.with_chain(vec![]);

        let result = analyzer.analyze(&family_context()).await;
        assert!(matches!(result, Err(AnalyzerError::AllProvidersFailed { .. })));
    }

    #[tokio::test]
    async fn test_fallback_in_chain_never_exhausts() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, true, Outcome::Fail)
            .script(ProviderKind::Gemini, true, Outcome::Fail);
        let (analyzer, _) = analyzer(factory, enabled_configs());

        for answer in ["vui", "buồn", "???", "ok"] {
            let ctx = AnalysisContext::new(3, "Q", answer, None).unwrap();
            let score = analyzer.analyze(&ctx).await.unwrap();
            assert_eq!(score.source, ScoreSource::Fallback);
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let (analyzer, _) = analyzer(ScriptedFactory::default(), ProviderConfigs::default());
        let contexts = vec![
            AnalysisContext::new(1, "Q1", "Con rất vui", None).unwrap(),
            AnalysisContext::new(2, "Q2", "Con buồn và sợ", None).unwrap(),
            AnalysisContext::new(3, "Q3", "bình thường", None).unwrap(),
        ];

        let scores = analyzer.analyze_batch(&contexts).await.unwrap();

        let labels: Vec<_> = scores.iter().map(|s| s.score).collect();
        assert_eq!(
            labels,
            vec![
                SentimentLabel::Positive,
                SentimentLabel::Negative,
                SentimentLabel::Neutral
            ]
        );
    }

    #[tokio::test]
    async fn test_batch_empty_input() {
        let (analyzer, _) = analyzer(ScriptedFactory::default(), ProviderConfigs::default());
        let scores = analyzer.analyze_batch(&[]).await.unwrap();
        assert!(scores.is_empty());
    }

    #[tokio::test]
    async fn test_provider_statuses() {
        let factory = ScriptedFactory::default()
            .script(ProviderKind::OpenAi, false, Outcome::Fail);
        let configs = ProviderConfigs::default()
            .with(ProviderKind::OpenAi, ProviderConfig::new("OpenAI").enabled(true));
        let (analyzer, registry) = analyzer(factory, configs);

        let statuses = analyzer.provider_statuses().await;

        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].enabled && !statuses[0].available);
        assert!(!statuses[1].enabled && !statuses[1].available);
        assert!(statuses[2].enabled && statuses[2].available);
        assert!(!registry.contains(ProviderKind::Gemini));
    }
}
