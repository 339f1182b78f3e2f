//! `affect analyze` and `affect batch`: score answers from the command line.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use affect_types::sentiment::{AnalysisContext, ScoreSource, SentimentLabel, SentimentScore};

use crate::state::AppState;

/// Score a single answer and print the result.
pub async fn analyze(
    state: &AppState,
    question_id: i64,
    question: String,
    answer: String,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let context = AnalysisContext::new(question_id, question, answer, category)?;
    let score = state.analyzer.analyze(&context).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else {
        println!();
        print_score(&context, &score);
        println!();
    }

    Ok(())
}

/// Score every context in a JSON array file. Output order matches input order.
pub async fn batch(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let contexts = read_contexts(file).await?;
    let scores = state.analyzer.analyze_batch(&contexts).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
        return Ok(());
    }

    println!();
    for (context, score) in contexts.iter().zip(scores.iter()) {
        print_score(context, score);
    }
    println!();
    println!(
        "  {} answer{} scored",
        style(scores.len()).bold(),
        if scores.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Parse and normalize a JSON array of contexts.
pub async fn read_contexts(file: &Path) -> Result<Vec<AnalysisContext>> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let contexts: Vec<AnalysisContext> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of analysis contexts", file.display()))?;

    contexts
        .into_iter()
        .enumerate()
        .map(|(i, ctx)| {
            ctx.normalized()
                .with_context(|| format!("Entry {i} in {}", file.display()))
        })
        .collect()
}

fn print_score(context: &AnalysisContext, score: &SentimentScore) {
    let label = match score.score {
        SentimentLabel::Positive => style("positive").green().bold(),
        SentimentLabel::Neutral => style("neutral").yellow().bold(),
        SentimentLabel::Negative => style("negative").red().bold(),
    };
    let source = match score.source {
        ScoreSource::Llm => style(score.source.to_string()).cyan(),
        ScoreSource::Fallback => style(score.source.to_string()).dim(),
    };
    let confidence = score
        .confidence
        .map(|c| format!("{:.0}%", c * 100.0))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "  Q{}  {} ({})  {} via {}  {}",
        context.question_id,
        label,
        score.score.as_u8(),
        style(&score.provider).bold(),
        source,
        style(confidence).dim()
    );
    if let Some(reasoning) = score.reasoning.as_deref() {
        println!("      {}", style(reasoning).dim());
    }
}
