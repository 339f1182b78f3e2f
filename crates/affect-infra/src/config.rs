//! Provider configuration loader.
//!
//! Configuration is layered: built-in defaults, then an optional
//! `affect.toml`, then `AFFECT_*` environment variables. A missing file
//! means defaults; a malformed file is logged and ignored. Invalid values
//! never abort startup: they are logged and the previous layer's value is
//! kept.
//!
//! ```toml
//! chain = ["gemini", "fallback"]
//!
//! [providers.gemini]
//! enabled = true
//! api_key = "..."
//! model = "gemini-2.0-flash"
//! timeout_ms = 8000
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use affect_core::sentiment::config::{DEFAULT_CHAIN, ProviderConfigs};
use affect_types::provider::{ProviderConfig, ProviderKind};

use crate::llm::gemini::GeminiProvider;
use crate::llm::openai::OpenAiProvider;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "affect.toml";

/// Environment variable holding the comma-separated chain order.
pub const CHAIN_ENV: &str = "AFFECT_PROVIDER_CHAIN";

/// Parsed contents of `affect.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub chain: Option<Vec<String>>,
    pub providers: FileProviders,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileProviders {
    pub openai: Option<FileProviderSection>,
    pub gemini: Option<FileProviderSection>,
    pub fallback: Option<FileProviderSection>,
}

impl FileProviders {
    fn section(&self, kind: ProviderKind) -> Option<&FileProviderSection> {
        match kind {
            ProviderKind::OpenAi => self.openai.as_ref(),
            ProviderKind::Gemini => self.gemini.as_ref(),
            ProviderKind::Fallback => self.fallback.as_ref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileProviderSection {
    pub name: Option<String>,
    pub enabled: Option<bool>,
    pub api_key: Option<SecretString>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_retries: Option<u32>,
}

/// Built-in defaults for a provider kind, before any file or env layer.
pub fn default_config(kind: ProviderKind) -> ProviderConfig {
    match kind {
        ProviderKind::OpenAi => ProviderConfig::new("OpenAI").with_model(OpenAiProvider::DEFAULT_MODEL),
        ProviderKind::Gemini => ProviderConfig::new("Gemini").with_model(GeminiProvider::DEFAULT_MODEL),
        ProviderKind::Fallback => affect_core::sentiment::config::fallback_defaults(),
    }
}

/// Load `path` as TOML.
///
/// - If the file does not exist, returns an empty [`FileConfig`].
/// - If the file exists but fails to parse, logs a warning and returns an empty config.
pub async fn load_config_file(path: &Path) -> FileConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return FileConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return FileConfig::default();
        }
    };

    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            FileConfig::default()
        }
    }
}

/// Build provider configs from the process environment only.
pub fn load_from_env() -> ProviderConfigs {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Build provider configs from an injected key lookup (no file layer).
pub fn load_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ProviderConfigs {
    resolve(&FileConfig::default(), lookup)
}

/// Load the optional config file, then apply the process environment.
pub async fn load(config_path: &Path) -> ProviderConfigs {
    let file = load_config_file(config_path).await;
    resolve(&file, |key| std::env::var(key).ok())
}

/// Merge defaults, a parsed file, and environment lookups (highest priority).
pub fn resolve(file: &FileConfig, lookup: impl Fn(&str) -> Option<String>) -> ProviderConfigs {
    let mut configs = ProviderConfigs::new();
    for kind in ProviderKind::ALL {
        let mut config = default_config(kind);
        if let Some(section) = file.providers.section(kind) {
            config = apply_section(config, section);
        }
        if kind.is_remote() {
            config = apply_env(kind, config, &lookup);
        }
        configs.set(kind, config);
    }

    let chain = match lookup(CHAIN_ENV) {
        Some(raw) => Some(parse_chain(raw.split(','))),
        None => file.chain.as_ref().map(|c| parse_chain(c.iter().map(String::as_str))),
    };

    match chain {
        Some(chain) if !chain.is_empty() => configs.with_chain(chain),
        Some(_) => {
            tracing::warn!("Configured provider chain is empty, using default order");
            configs.with_chain(DEFAULT_CHAIN)
        }
        None => configs,
    }
}

fn apply_section(mut config: ProviderConfig, section: &FileProviderSection) -> ProviderConfig {
    if let Some(name) = &section.name {
        config.name = name.clone();
    }
    if let Some(enabled) = section.enabled {
        config = config.enabled(enabled);
    }
    if let Some(key) = &section.api_key {
        config = config.with_credential(key.expose_secret());
    }
    if let Some(model) = &section.model {
        config = config.with_model(model.as_str());
    }
    if let Some(base_url) = &section.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(timeout_ms) = section.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if let Some(max_retries) = section.max_retries {
        config = config.with_max_retries(max_retries);
    }
    config
}

fn apply_env(
    kind: ProviderKind,
    mut config: ProviderConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> ProviderConfig {
    let prefix = kind.to_string().to_uppercase();
    let var = |suffix: &str| {
        lookup(&format!("AFFECT_{prefix}_{suffix}"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if let Some(key) = var("API_KEY") {
        config = config.with_credential(key);
    }
    if let Some(model) = var("MODEL") {
        config = config.with_model(model);
    }
    if let Some(base_url) = var("BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Some(flag) = lookup(&format!("AFFECT_ENABLE_{prefix}")) {
        config = config.enabled(parse_flag(&flag));
    }
    if let Some(raw) = var("TIMEOUT_MS") {
        match raw.parse::<u64>() {
            Ok(timeout_ms) => config = config.with_timeout_ms(timeout_ms),
            Err(err) => tracing::warn!(
                %kind,
                value = %raw,
                "Invalid AFFECT_{prefix}_TIMEOUT_MS: {err}, keeping {}ms",
                config.timeout_ms
            ),
        }
    }
    if let Some(raw) = var("MAX_RETRIES") {
        match raw.parse::<u32>() {
            Ok(max_retries) => config = config.with_max_retries(max_retries),
            Err(err) => tracing::warn!(
                %kind,
                value = %raw,
                "Invalid AFFECT_{prefix}_MAX_RETRIES: {err}, keeping {}",
                config.max_retries
            ),
        }
    }

    config
}

/// `true`, `1`, `yes`, `on` (any case) enable; anything else disables.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_chain<'a>(entries: impl Iterator<Item = &'a str>) -> Vec<ProviderKind> {
    entries
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<ProviderKind>() {
            Ok(kind) => Some(kind),
            Err(err) => {
                tracing::warn!(entry, "Ignoring unknown provider in chain: {err}");
                None
            }
        })
        .collect()
}
