//! GeminiProvider -- concrete [`SentimentProvider`] backed by Gemini `generateContent`.
//!
//! Gemini takes its API key as a `key` query parameter, so request errors
//! are stripped of their URL before being logged or returned.

use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::Instrument;

use affect_core::sentiment::provider::SentimentProvider;
use affect_types::error::ProviderError;
use affect_types::provider::{ProviderConfig, ProviderKind};
use affect_types::sentiment::{AnalysisContext, SentimentScore};

use super::types::{GenerateRequest, GenerateResponse, GenerationConfig};
use crate::llm::prompt::vietnamese_prompt;
use crate::llm::remote::{ConfidenceHints, RemoteSettings};

/// Gemini sentiment provider.
pub struct GeminiProvider {
    remote: RemoteSettings,
}

impl GeminiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL: &'static str = "gemini-2.0-flash";

    const TEMPERATURE: f64 = 0.2;
    const MAX_OUTPUT_TOKENS: u32 = 500;
    const CONFIDENCE: ConfidenceHints = ConfidenceHints {
        structured: 0.85,
        heuristic: 0.6,
    };

    /// Build a provider from its config. Performs no I/O.
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let remote = RemoteSettings::from_config(config, Self::DEFAULT_BASE_URL, Self::DEFAULT_MODEL)?;
        Ok(Self { remote })
    }

    pub fn model(&self) -> &str {
        &self.remote.model
    }

    /// Override the retry backoff unit (default one second).
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.remote.backoff_unit = unit;
        self
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.remote.base_url, self.remote.model)
    }

    async fn request_once(&self, context: &AnalysisContext) -> Result<String, ProviderError> {
        let api_key = self.remote.api_key.as_ref().ok_or(ProviderError::MissingCredential)?;

        let body = GenerateRequest::text(
            vietnamese_prompt(context),
            GenerationConfig {
                temperature: Self::TEMPERATURE,
                max_output_tokens: Self::MAX_OUTPUT_TOKENS,
            },
        );

        let response = self
            .remote
            .client
            .post(self.generate_url())
            .query(&[("key", api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: error_body,
            });
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            ProviderError::Deserialization(format!("failed to parse response: {}", e.without_url()))
        })?;

        Ok(generated.first_text().to_string())
    }

    async fn score(&self, context: &AnalysisContext) -> Result<SentimentScore, ProviderError> {
        let raw = self.remote.call(|| self.request_once(context)).await?;
        Ok(self.remote.score_from(&raw, Self::CONFIDENCE))
    }
}

impl SentimentProvider for GeminiProvider {
    fn name(&self) -> &str {
        &self.remote.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    /// Enabled and keyed; no network probe.
    async fn is_available(&self) -> bool {
        self.remote.is_configured()
    }

    async fn analyze_sentiment(
        &self,
        context: &AnalysisContext,
    ) -> Result<SentimentScore, ProviderError> {
        let span = tracing::info_span!(
            "gen_ai.generate_content",
            gen_ai.provider.name = %self.remote.name,
            gen_ai.request.model = %self.remote.model,
            gen_ai.request.temperature = Self::TEMPERATURE,
            gen_ai.request.max_tokens = Self::MAX_OUTPUT_TOKENS,
        );
        self.score(context).instrument(span).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affect_types::sentiment::{ScoreSource, SentimentLabel};
    use mockito::Matcher;

    const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

    fn context() -> AnalysisContext {
        AnalysisContext::new(
            4,
            "Con có hay cãi nhau với bạn không?",
            "Con hay bị bạn bắt nạt",
            Some("Bạn bè".into()),
        )
        .unwrap()
    }

    fn config(base_url: &str) -> ProviderConfig {
        ProviderConfig::new("Gemini")
            .enabled(true)
            .with_credential("g-test")
            .with_base_url(base_url)
            .with_timeout_ms(2_000)
            .with_max_retries(1)
    }

    fn provider(config: &ProviderConfig) -> GeminiProvider {
        GeminiProvider::new(config)
            .unwrap()
            .with_backoff_unit(Duration::from_millis(5))
    }

    fn generated(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_fenced_json_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "g-test".into()))
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": { "temperature": 0.2, "maxOutputTokens": 500 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(generated(
                "```json\n{\"score\": 2, \"reasoning\": \"Trẻ bị bắt nạt\"}\n```",
            ))
            .create_async()
            .await;

        let provider = provider(&config(&server.url()));
        let score = provider.analyze_sentiment(&context()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(score.score, SentimentLabel::Negative);
        assert_eq!(score.source, ScoreSource::Llm);
        assert_eq!(score.provider, "Gemini");
        assert_eq!(score.confidence, Some(0.85));
        assert_eq!(score.reasoning.as_deref(), Some("Trẻ bị bắt nạt"));
    }

    #[tokio::test]
    async fn test_prompt_is_vietnamese() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("Danh mục: Bạn bè".into()))
            .with_status(200)
            .with_body(generated(r#"{"score": 1}"#))
            .create_async()
            .await;

        let provider = provider(&config(&server.url()));
        provider.analyze_sentiment(&context()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back_to_heuristic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(generated("{score: this looks negative"))
            .create_async()
            .await;

        let provider = provider(&config(&server.url()));
        let score = provider.analyze_sentiment(&context()).await.unwrap();

        assert_eq!(score.score, SentimentLabel::Negative);
        assert_eq!(score.confidence, Some(0.6));
        assert_eq!(score.reasoning.as_deref(), Some("{score: this looks negative"));
    }

    #[tokio::test]
    async fn test_out_of_range_json_score_keeps_model_reasoning() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(generated(r#"{"score": 3, "reasoning": "em rất tiêu cực"}"#))
            .create_async()
            .await;

        let provider = provider(&config(&server.url()));
        let score = provider.analyze_sentiment(&context()).await.unwrap();

        assert_eq!(score.score, SentimentLabel::Negative);
        assert_eq!(score.confidence, Some(0.85));
        assert_eq!(score.reasoning.as_deref(), Some("em rất tiêu cực"));
    }

    #[tokio::test]
    async fn test_http_error_does_not_leak_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("permission denied")
            .create_async()
            .await;

        let provider = provider(&config(&server.url()));
        let err = provider.analyze_sentiment(&context()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Http { status: 403, .. }));
        assert!(!err.to_string().contains("g-test"));
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_key() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = provider(&config(&format!("http://{addr}")));
        let err = provider.analyze_sentiment(&context()).await.unwrap_err();

        assert!(matches!(err, ProviderError::Network(_)));
        assert!(!err.to_string().contains("g-test"));
    }

    #[tokio::test]
    async fn test_availability_needs_key_and_enabled() {
        let keyed = provider(&config("http://unused"));
        assert!(keyed.is_available().await);

        let disabled = provider(&config("http://unused").enabled(false));
        assert!(!disabled.is_available().await);

        let blank = GeminiProvider::new(&ProviderConfig::new("Gemini").enabled(true).with_credential("  "))
            .unwrap();
        assert!(!blank.is_available().await);
    }

    #[test]
    fn test_generate_url() {
        let provider = GeminiProvider::new(&ProviderConfig::new("Gemini").with_model("gemini-pro")).unwrap();
        assert_eq!(
            provider.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
        assert_eq!(provider.model(), "gemini-pro");
    }
}
