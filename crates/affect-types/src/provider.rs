//! Provider identity and configuration types.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Provider-type tag used to order the chain and key the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
    Fallback,
}

impl ProviderKind {
    /// All kinds, in default chain order.
    pub const ALL: [ProviderKind; 3] = [ProviderKind::OpenAi, ProviderKind::Gemini, ProviderKind::Fallback];

    /// Whether this kind talks to a remote backend.
    pub fn is_remote(self) -> bool {
        !matches!(self, ProviderKind::Fallback)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "fallback" => Ok(ProviderKind::Fallback),
            other => Err(format!("invalid provider type: '{other}'")),
        }
    }
}

/// Settings for a single provider.
///
/// Loaded once at process start and read-only thereafter. The credential is
/// wrapped in [`SecretString`] so it never shows up in `Debug` output or logs.
#[derive(Debug)]
pub struct ProviderConfig {
    /// Display name reported in `SentimentScore.provider`.
    pub name: String,
    pub credential: Option<SecretString>,
    pub model: Option<String>,
    /// Override the backend's default endpoint (proxies, tests).
    pub base_url: Option<String>,
    pub enabled: bool,
    /// Per-attempt timeout; always > 0.
    pub timeout_ms: u64,
    /// Attempt budget; always >= 1.
    pub max_retries: u32,
}

impl ProviderConfig {
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// A disabled config with default timeout and retry budget.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            credential: None,
            model: None,
            base_url: None,
            enabled: false,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            max_retries: Self::DEFAULT_MAX_RETRIES,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(SecretString::from(credential.into()));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms.max(1);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// True if a non-blank credential is configured.
    pub fn has_credential(&self) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|c| !c.expose_secret().trim().is_empty())
    }
}

impl Clone for ProviderConfig {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            credential: self
                .credential
                .as_ref()
                .map(|c| SecretString::from(c.expose_secret().to_owned())),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            enabled: self.enabled,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
        }
    }
}

/// Snapshot of one chain entry, for status displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub kind: ProviderKind,
    pub name: String,
    pub enabled: bool,
    pub available: bool,
}
