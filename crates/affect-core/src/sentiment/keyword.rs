//! Offline keyword-frequency scorer -- the chain's terminal provider.
//!
//! Pure function of the answer text: no I/O, no state, never fails.

use affect_types::error::ProviderError;
use affect_types::provider::{ProviderConfig, ProviderKind};
use affect_types::sentiment::{AnalysisContext, ScoreSource, SentimentLabel, SentimentScore};

use super::provider::SentimentProvider;

/// Fixed low confidence reflecting the heuristic nature of keyword counting.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

const FALLBACK_REASONING: &str = "Fallback keyword analysis";

/// Positive keywords (Vietnamese and English).
const POSITIVE_KEYWORDS: &[&str] = &[
    "vui", "hạnh phúc", "yêu", "thích", "tốt", "tuyệt", "vời", "hay",
    "happy", "love", "good", "great", "wonderful", "nice", "enjoy",
    "quan tâm", "hiểu", "giúp", "thân", "gần gũi",
];

/// Negative keywords (Vietnamese and English).
const NEGATIVE_KEYWORDS: &[&str] = &[
    "buồn", "khóc", "sợ", "ghét", "tức", "giận", "lo", "lắng",
    "sad", "cry", "fear", "hate", "angry", "worried", "afraid",
    "không thích", "xa cách", "ít", "không", "chẳng", "la mắng",
];

/// Score text by counting which positive and negative keywords occur
/// (case-insensitive substring match; each keyword counts once).
pub fn score_keywords(text: &str) -> SentimentLabel {
    let lower = text.to_lowercase();
    let positive = POSITIVE_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    let negative = NEGATIVE_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    }
}

/// Always-available keyword heuristic provider.
#[derive(Debug, Clone)]
pub struct LocalFallbackProvider {
    name: String,
}

impl LocalFallbackProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            name: config.name.clone(),
        }
    }
}

impl Default for LocalFallbackProvider {
    fn default() -> Self {
        Self {
            name: "Fallback".to_string(),
        }
    }
}

impl SentimentProvider for LocalFallbackProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Fallback
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn analyze_sentiment(
        &self,
        context: &AnalysisContext,
    ) -> Result<SentimentScore, ProviderError> {
        tracing::debug!(provider = %self.name, "Using fallback keyword analysis");

        let score = score_keywords(&context.answer_text);
        Ok(SentimentScore::new(score, &self.name, ScoreSource::Fallback)
            .with_confidence(FALLBACK_CONFIDENCE)
            .with_reasoning(FALLBACK_REASONING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(answer: &str) -> AnalysisContext {
        AnalysisContext::new(1, "Bạn cảm thấy thế nào về gia đình?", answer, None).unwrap()
    }

    #[test]
    fn test_positive_answer() {
        assert_eq!(score_keywords("Con rất vui và yêu gia đình"), SentimentLabel::Positive);
        assert_eq!(score_keywords("I LOVE my family, we are HAPPY"), SentimentLabel::Positive);
    }

    #[test]
    fn test_negative_answer() {
        assert_eq!(score_keywords("Con buồn và sợ bố mẹ la mắng"), SentimentLabel::Negative);
        assert_eq!(score_keywords("I feel sad and afraid"), SentimentLabel::Negative);
    }

    #[test]
    fn test_tie_is_neutral() {
        assert_eq!(score_keywords("happy but sad"), SentimentLabel::Neutral);
        assert_eq!(score_keywords("123"), SentimentLabel::Neutral);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        // "sad" twice vs "good" + "nice": distinct keywords are counted.
        assert_eq!(score_keywords("sad sad, good, nice"), SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_provider_output_shape() {
        let provider = LocalFallbackProvider::default();
        assert!(provider.is_available().await);

        let score = provider
            .analyze_sentiment(&context("Con rất vui và yêu gia đình"))
            .await
            .unwrap();
        assert_eq!(score.score, SentimentLabel::Positive);
        assert_eq!(score.source, ScoreSource::Fallback);
        assert_eq!(score.provider, "Fallback");
        assert_eq!(score.confidence, Some(FALLBACK_CONFIDENCE));
        assert_eq!(score.reasoning.as_deref(), Some("Fallback keyword analysis"));
        assert!(score.error.is_none());
    }

    #[tokio::test]
    async fn test_provider_is_deterministic() {
        let provider = LocalFallbackProvider::new(&ProviderConfig::new("Offline"));
        let ctx = context("Con thích đi học nhưng hơi lo lắng");

        let first = provider.analyze_sentiment(&ctx).await.unwrap();
        for _ in 0..10 {
            let again = provider.analyze_sentiment(&ctx).await.unwrap();
            assert_eq!(again.score, first.score);
        }
        assert_eq!(first.provider, "Offline");
    }
}
