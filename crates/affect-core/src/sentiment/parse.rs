//! Normalization of free-form model output into a [`SentimentLabel`].
//!
//! Remote models are asked for strict JSON (`{"score": 0|1|2, "reasoning": "..."}`)
//! but frequently wrap it in markdown fences or answer in prose. The
//! structured path is tried first; [`parse_score`] is the heuristic fallback
//! and never fails.

use affect_types::sentiment::SentimentLabel;

const POSITIVE_MARKERS: [&str; 2] = ["positive", "tích cực"];
const NEGATIVE_MARKERS: [&str; 2] = ["negative", "tiêu cực"];

/// Heuristic score extraction from raw model text.
///
/// Priority:
/// 1. a literal `"score":N` / `"score": N` anywhere in the text (N in 0..=2)
/// 2. a positive keyword yields `Positive`, else a negative keyword yields `Negative`
/// 3. `Neutral`
pub fn parse_score(raw: &str) -> SentimentLabel {
    let lower = raw.to_lowercase();

    for label in [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ] {
        let n = label.as_u8();
        if lower.contains(&format!("\"score\":{n}")) || lower.contains(&format!("\"score\": {n}")) {
            return label;
        }
    }

    if POSITIVE_MARKERS.iter().any(|kw| lower.contains(kw)) {
        return SentimentLabel::Positive;
    }
    if NEGATIVE_MARKERS.iter().any(|kw| lower.contains(kw)) {
        return SentimentLabel::Negative;
    }

    SentimentLabel::Neutral
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text.trim()
}

/// A model response that parsed as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredVerdict {
    /// `None` when `score` is missing, not an integer, or outside 0..=2.
    pub score: Option<SentimentLabel>,
    pub reasoning: Option<String>,
}

/// Parse `{"score": 0|1|2, "reasoning": "..."}`, tolerating code fences.
///
/// Returns `None` only if the text is not a JSON object.
pub fn parse_structured(raw: &str) -> Option<StructuredVerdict> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(raw)).ok()?;
    let obj = value.as_object()?;

    let score = obj
        .get("score")
        .and_then(|score| match score {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        })
        .and_then(|n| SentimentLabel::try_from(n).ok());

    let reasoning = obj
        .get("reasoning")
        .and_then(|r| r.as_str())
        .map(str::to_string);

    Some(StructuredVerdict { score, reasoning })
}

/// How a model response was interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub score: SentimentLabel,
    pub reasoning: String,
    /// True if the response parsed as a JSON object.
    pub structured: bool,
}

/// Interpret a raw model response: structured JSON first, heuristic second.
///
/// A JSON object whose `score` is unusable still counts as structured; only
/// the score then comes from [`parse_score`]. Without JSON reasoning the
/// reasoning is the fence-stripped raw text.
pub fn interpret_response(raw: &str) -> Interpretation {
    let stripped = strip_code_fence(raw);

    match parse_structured(raw) {
        Some(verdict) => Interpretation {
            score: verdict.score.unwrap_or_else(|| parse_score(stripped)),
            reasoning: verdict.reasoning.unwrap_or_else(|| stripped.to_string()),
            structured: true,
        },
        None => Interpretation {
            score: parse_score(stripped),
            reasoning: stripped.to_string(),
            structured: false,
        },
    }
}
