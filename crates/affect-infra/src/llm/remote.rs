//! Settings and call plumbing shared by the remote HTTP providers.
//!
//! Each remote provider owns a [`RemoteSettings`] built from its
//! [`ProviderConfig`] and only supplies the request itself and its
//! confidence hints.

use std::future::Future;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use affect_core::sentiment::parse::interpret_response;
use affect_core::sentiment::resilience::{BACKOFF_UNIT, with_retry_backoff, with_timeout};
use affect_types::error::ProviderError;
use affect_types::provider::ProviderConfig;
use affect_types::sentiment::{ScoreSource, SentimentScore};

/// Fixed confidence reported for a parsed JSON response and for a
/// heuristic one. Informal hints, not calibrated probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceHints {
    pub structured: f64,
    pub heuristic: f64,
}

/// Resolved connection settings for one remote provider.
pub struct RemoteSettings {
    pub client: reqwest::Client,
    pub name: String,
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub enabled: bool,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub backoff_unit: Duration,
}

impl RemoteSettings {
    /// Resolve `config` against the provider's defaults. Performs no I/O.
    ///
    /// A blank credential is dropped rather than rejected; the provider then
    /// reports itself unavailable.
    pub fn from_config(
        config: &ProviderConfig,
        default_base_url: &str,
        default_model: &str,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProviderError::Construction(format!("HTTP client: {e}")))?;

        let api_key = if config.has_credential() {
            config
                .credential
                .as_ref()
                .map(|k| SecretString::from(k.expose_secret().trim().to_owned()))
        } else {
            None
        };

        Ok(Self {
            client,
            name: config.name.clone(),
            api_key,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(default_base_url)
                .trim_end_matches('/')
                .to_string(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
            enabled: config.enabled,
            timeout_ms: config.timeout_ms,
            max_retries: config.max_retries,
            backoff_unit: BACKOFF_UNIT,
        })
    }

    /// Enabled and holding a non-blank key.
    pub fn is_configured(&self) -> bool {
        self.enabled && self.api_key.is_some()
    }

    /// Run `attempt` under the per-attempt timeout, retried with backoff.
    pub async fn call<F, Fut>(&self, mut attempt: F) -> Result<String, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<String, ProviderError>>,
    {
        let timeout_ms = self.timeout_ms;
        with_retry_backoff(&self.name, self.max_retries, self.backoff_unit, move || {
            with_timeout(timeout_ms, attempt())
        })
        .await
    }

    /// Turn raw model text into a score attributed to this provider.
    pub fn score_from(&self, raw: &str, hints: ConfidenceHints) -> SentimentScore {
        let interpretation = interpret_response(raw);
        let confidence = if interpretation.structured {
            hints.structured
        } else {
            hints.heuristic
        };

        SentimentScore::new(interpretation.score, &self.name, ScoreSource::Llm)
            .with_confidence(confidence)
            .with_reasoning(interpretation.reasoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use affect_types::sentiment::SentimentLabel;

    const HINTS: ConfidenceHints = ConfidenceHints {
        structured: 0.9,
        heuristic: 0.5,
    };

    fn settings(config: &ProviderConfig) -> RemoteSettings {
        RemoteSettings::from_config(config, "https://api.example.com/v1/", "model-a").unwrap()
    }

    #[test]
    fn test_defaults_and_trimming() {
        let remote = settings(&ProviderConfig::new("Remote").with_credential("  k-1  "));

        assert_eq!(remote.base_url, "https://api.example.com/v1");
        assert_eq!(remote.model, "model-a");
        assert_eq!(remote.api_key.as_ref().map(|k| k.expose_secret()), Some("k-1"));
        assert!(!remote.is_configured());
    }

    #[test]
    fn test_blank_key_is_dropped() {
        let remote = settings(&ProviderConfig::new("Remote").enabled(true).with_credential(" "));
        assert!(remote.api_key.is_none());
        assert!(!remote.is_configured());
    }

    #[test]
    fn test_score_from_picks_confidence() {
        let remote = settings(&ProviderConfig::new("Remote"));

        let structured = remote.score_from(r#"{"score": 0, "reasoning": "vui"}"#, HINTS);
        assert_eq!(structured.score, SentimentLabel::Positive);
        assert_eq!(structured.confidence, Some(0.9));
        assert_eq!(structured.provider, "Remote");

        let heuristic = remote.score_from("sounds negative", HINTS);
        assert_eq!(heuristic.score, SentimentLabel::Negative);
        assert_eq!(heuristic.confidence, Some(0.5));
    }

    #[tokio::test]
    async fn test_call_retries_within_budget() {
        let remote = RemoteSettings {
            backoff_unit: Duration::from_millis(1),
            ..settings(&ProviderConfig::new("Remote").with_max_retries(2))
        };
        let calls = std::sync::atomic::AtomicU32::new(0);

        let result = remote
            .call(|| {
                let n = calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ProviderError::Network("reset".into()))
                    } else {
                        Ok("ok".to_string())
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }
}
