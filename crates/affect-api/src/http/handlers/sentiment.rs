//! Sentiment scoring endpoints.
//!
//! POST /api/analyze-text  - Score one answer.
//! POST /api/analyze-batch - Score an array of answers, order preserved.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use affect_types::error::AnalyzerError;
use affect_types::sentiment::{AnalysisContext, SentimentScore};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for a single answer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub question_id: i64,
    #[serde(default)]
    pub question_text: String,
    #[serde(default)]
    pub answer_text: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl AnalyzeTextRequest {
    fn into_context(self) -> Result<AnalysisContext, AnalyzerError> {
        AnalysisContext::new(
            self.question_id,
            self.question_text,
            self.answer_text,
            self.category,
        )
    }
}

/// POST /api/analyze-text
///
/// Returns the [`SentimentScore`] as-is. A blank `answerText` is a 400;
/// chain exhaustion is a 500.
pub async fn analyze_text(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<SentimentScore>, AppError> {
    let Json(request) = payload?;
    let context = request.into_context()?;

    let score = state.analyzer.analyze(&context).await?;

    tracing::info!(
        question_id = context.question_id,
        score = score.score.as_u8(),
        provider = %score.provider,
        "Answer scored"
    );

    Ok(Json(score))
}

/// POST /api/analyze-batch
///
/// Body is a JSON array of the single-answer request shape. Every entry is
/// validated before any provider is called.
pub async fn analyze_batch(
    State(state): State<AppState>,
    payload: Result<Json<Vec<AnalyzeTextRequest>>, JsonRejection>,
) -> Result<Json<Vec<SentimentScore>>, AppError> {
    let Json(requests) = payload?;

    let contexts = requests
        .into_iter()
        .enumerate()
        .map(|(i, request)| {
            request
                .into_context()
                .map_err(|_| AppError::Validation(format!("answerText is required (item {i})")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let scores = state.analyzer.analyze_batch(&contexts).await?;

    tracing::info!(count = scores.len(), "Batch scored");

    Ok(Json(scores))
}
