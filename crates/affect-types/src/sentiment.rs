//! Sentiment request/response types.
//!
//! [`AnalysisContext`] is the input bundle submitted for scoring and
//! [`SentimentScore`] is the normalized 3-way output. The JSON field names
//! of `SentimentScore` are a compatibility contract with downstream
//! consumers (result storage, review UI) and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalyzerError;

/// Categorical sentiment of an answer.
///
/// Serialized as the bare integer `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum SentimentLabel {
    Positive = 0,
    Neutral = 1,
    Negative = 2,
}

impl SentimentLabel {
    /// Numeric wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<SentimentLabel> for u8 {
    fn from(label: SentimentLabel) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for SentimentLabel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SentimentLabel::Positive),
            1 => Ok(SentimentLabel::Neutral),
            2 => Ok(SentimentLabel::Negative),
            other => Err(format!("invalid sentiment score: {other}")),
        }
    }
}

impl TryFrom<i64> for SentimentLabel {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| format!("invalid sentiment score: {value}"))
            .and_then(<SentimentLabel as TryFrom<u8>>::try_from)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Where a score came from: a remote model or the offline keyword heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    Llm,
    Fallback,
}

impl fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreSource::Llm => write!(f, "llm"),
            ScoreSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// Input bundle for a single scoring request.
///
/// Constructed per request and never persisted by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisContext {
    pub question_id: i64,
    #[serde(default)]
    pub question_text: String,
    pub answer_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl AnalysisContext {
    /// Build a context, trimming the answer.
    ///
    /// Returns [`AnalyzerError::EmptyAnswer`] if the trimmed answer is empty.
    pub fn new(
        question_id: i64,
        question_text: impl Into<String>,
        answer_text: impl AsRef<str>,
        category: Option<String>,
    ) -> Result<Self, AnalyzerError> {
        Self {
            question_id,
            question_text: question_text.into(),
            answer_text: answer_text.as_ref().to_string(),
            category,
        }
        .normalized()
    }

    /// Trim the answer and drop a blank category.
    ///
    /// Used on contexts that arrive deserialized from the wire.
    pub fn normalized(mut self) -> Result<Self, AnalyzerError> {
        let trimmed = self.answer_text.trim();
        if trimmed.is_empty() {
            return Err(AnalyzerError::EmptyAnswer);
        }
        self.answer_text = trimmed.to_string();
        self.category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(self)
    }

    /// Category label, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Normalized scoring result plus provenance metadata.
///
/// Produced exactly once per `analyze` call and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentScore {
    pub score: SentimentLabel,
    /// Informal quality hint; not a calibrated probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Display name of the provider that produced the score.
    pub provider: String,
    pub source: ScoreSource,
    pub analyzed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentScore {
    /// Create a score stamped with the current time.
    pub fn new(score: SentimentLabel, provider: impl Into<String>, source: ScoreSource) -> Self {
        Self {
            score,
            confidence: None,
            reasoning: None,
            provider: provider.into(),
            source,
            analyzed_at: Utc::now(),
            error: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}
