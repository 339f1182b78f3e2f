//! OpenAiProvider -- concrete [`SentimentProvider`] backed by OpenAI chat completions.
//!
//! Sends the English prompt to `{base_url}/chat/completions` with bearer
//! authentication. Every attempt is bounded by the configured timeout and
//! the attempt sequence is retried with exponential backoff.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is only exposed
//! when building the `Authorization` header.

use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::Instrument;

use affect_core::sentiment::provider::SentimentProvider;
use affect_types::error::ProviderError;
use affect_types::provider::{ProviderConfig, ProviderKind};
use affect_types::sentiment::{AnalysisContext, SentimentScore};

use super::types::{ChatMessage, ChatRequest, ChatResponse};
use crate::llm::prompt::{SYSTEM_PROMPT, english_prompt};
use crate::llm::remote::{ConfidenceHints, RemoteSettings};

/// OpenAI sentiment provider.
pub struct OpenAiProvider {
    remote: RemoteSettings,
}

impl OpenAiProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    const TEMPERATURE: f64 = 0.3;
    const MAX_TOKENS: u32 = 200;
    const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
    const CONFIDENCE: ConfidenceHints = ConfidenceHints {
        structured: 0.8,
        heuristic: 0.7,
    };

    /// Build a provider from its config. Performs no I/O.
    ///
    /// A missing credential is not a construction error: the provider then
    /// reports itself unavailable.
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

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.remote.base_url, path)
    }

    /// One HTTP round trip; returns the first choice's text.
    async fn request_once(&self, context: &AnalysisContext) -> Result<String, ProviderError> {
        let api_key = self.remote.api_key.as_ref().ok_or(ProviderError::MissingCredential)?;

        let body = ChatRequest {
            model: self.remote.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(english_prompt(context)),
            ],
            temperature: Self::TEMPERATURE,
            max_tokens: Self::MAX_TOKENS,
        };

        let response = self
            .remote
            .client
            .post(self.url("/chat/completions"))
            .bearer_auth(api_key.expose_secret())
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

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("failed to parse response: {e}")))?;

        Ok(chat.first_content().to_string())
    }

    async fn score(&self, context: &AnalysisContext) -> Result<SentimentScore, ProviderError> {
        let content = self.remote.call(|| self.request_once(context)).await?;
        Ok(self.remote.score_from(&content, Self::CONFIDENCE))
    }
}

// No Debug derive: keeps the client and credential out of formatted output.

impl SentimentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.remote.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    /// Enabled, keyed, and `GET /models` answers with success within 5 s.
    async fn is_available(&self) -> bool {
        if !self.remote.is_configured() {
            return false;
        }
        let Some(api_key) = self.remote.api_key.as_ref() else {
            return false;
        };

        match self
            .remote
            .client
            .get(self.url("/models"))
            .bearer_auth(api_key.expose_secret())
            .timeout(Self::PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::debug!(provider = %self.remote.name, error = %err.without_url(), "Availability probe failed");
                false
            }
        }
    }

    async fn analyze_sentiment(
        &self,
        context: &AnalysisContext,
    ) -> Result<SentimentScore, ProviderError> {
        let span = tracing::info_span!(
            "gen_ai.chat",
            gen_ai.provider.name = %self.remote.name,
            gen_ai.request.model = %self.remote.model,
            gen_ai.request.temperature = Self::TEMPERATURE,
            gen_ai.request.max_tokens = Self::MAX_TOKENS,
        );
        self.score(context).instrument(span).await
    }
}
