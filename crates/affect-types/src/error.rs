use thiserror::Error;

/// Errors raised by a single sentiment provider.
///
/// All of these are transient from the analyzer's point of view: they are
/// logged and the chain moves on to the next provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("no credential configured")]
    MissingCredential,

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("failed to construct provider: {0}")]
    Construction(String),
}

/// Errors surfaced to callers of the analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Every provider in the chain was skipped or failed. Signals a
    /// configuration defect: the fallback provider should make this unreachable.
    #[error(
        "all providers failed (attempted: {})",
        if attempted.is_empty() { "none".to_string() } else { attempted.join(", ") }
    )]
    AllProvidersFailed { attempted: Vec<String> },

    #[error("answerText is required")]
    EmptyAnswer,
}
