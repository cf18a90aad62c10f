//! LLM narrative insight over persisted ranking tables.

use anyhow::{ensure, Result};
use tracing::info;

use crate::{
    classify::client::{ChatBackend, ChatMessage},
    cli::InsightFocus,
    config::Settings,
    ranking::{
        self,
        quadrant::{self, QuadrantLabel},
        RankKind, RankingRow,
    },
    taxonomy,
};

/// Generate narrative guidance for one business's ranking table.
pub async fn generate(
    backend: &dyn ChatBackend,
    business: &str,
    focus: InsightFocus,
    settings: &Settings,
) -> Result<String> {
    let table = ranking::load_table(business, settings)?;
    let (system, prompt) = match focus {
        InsightFocus::Importance => importance_prompt(business, &table)?,
        InsightFocus::Satisfaction => satisfaction_prompt(business, &table)?,
        InsightFocus::Quadrant => quadrant_prompt(business, &table)?,
    };
    info!(%business, ?focus, "requesting narrative insight");
    backend
        .complete(
            vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            1.0,
        )
        .await
}

fn importance_prompt(business: &str, table: &[RankingRow]) -> Result<(String, String)> {
    // The persisted importance block is already sorted descending by mentions.
    let top: Vec<String> = table
        .iter()
        .filter(|row| row.kind == RankKind::Importance)
        .take(5)
        .map(|row| format!("{} ({})", row.mot, row.mentions.unwrap_or(0)))
        .collect();
    ensure!(
        !top.is_empty(),
        "ranking table for '{business}' has no importance rows"
    );
    let summary = top.join("; ");
    let prompt = format!(
        "For the business '{business}', the top Moments of Truth based on mentions are: {summary}.\n\n\
         Please analyse and provide:\n\
         1. What do customers seem to value the most?\n\
         2. Which areas should be prioritised for improvement or continued focus?"
    );
    Ok((
        "You are a customer experience consultant.".to_string(),
        prompt,
    ))
}

fn satisfaction_prompt(business: &str, table: &[RankingRow]) -> Result<(String, String)> {
    // The persisted satisfaction block ascends, scored rows first.
    let scored: Vec<&RankingRow> = table
        .iter()
        .filter(|row| row.kind == RankKind::Satisfaction && row.avg_sentiment.is_some())
        .collect();
    ensure!(
        !scored.is_empty(),
        "ranking table for '{business}' has no scored satisfaction rows"
    );
    let describe = |row: &RankingRow| {
        let avg = row.avg_sentiment.unwrap_or(0.0);
        format!("{} ({avg:.2}, {})", row.mot, taxonomy::sentiment_label(avg))
    };
    let bottom: Vec<String> = scored.iter().take(3).map(|row| describe(row)).collect();
    let top: Vec<String> = scored.iter().rev().take(3).map(|row| describe(row)).collect();
    let prompt = format!(
        "For the business '{business}', the highest-rated Moments of Truth are: {}.\n\
         The lowest-rated are: {}.\n\n\
         Please analyse and provide:\n\
         1. What are customers most satisfied with?\n\
         2. What are customers least satisfied with?\n\
         3. Where should the business focus to improve satisfaction?",
        top.join("; "),
        bottom.join("; "),
    );
    Ok(("You are a customer experience analyst.".to_string(), prompt))
}

fn quadrant_prompt(business: &str, table: &[RankingRow]) -> Result<(String, String)> {
    let points = quadrant::classify_quadrants(table);
    ensure!(
        !points.is_empty(),
        "no MoTs carry both mentions and a satisfaction mean for '{business}'"
    );
    let mut sections = Vec::new();
    for label in [
        QuadrantLabel::FixNow,
        QuadrantLabel::InvestFurther,
        QuadrantLabel::Deprioritise,
        QuadrantLabel::Maintain,
    ] {
        let members: Vec<String> = points
            .iter()
            .filter(|point| point.label == label)
            .map(|point| {
                format!(
                    "{} (Mentions: {}, Sentiment: {:.2})",
                    point.mot, point.mentions, point.avg_sentiment
                )
            })
            .collect();
        if members.is_empty() {
            sections.push(format!("{}:\nNo items in this quadrant.", label.as_str()));
        } else {
            sections.push(format!("{}:\n{}", label.as_str(), members.join("; ")));
        }
    }
    let prompt = format!(
        "You are analysing customer feedback for the business '{business}'.\n\n\
         Here is the distribution of Moments of Truth (MoTs) based on Importance and Satisfaction:\n\n\
         {}\n\n\
         Please explain what needs urgent attention, what should be enhanced, \
         what can be deprioritised, and what should be maintained.",
        sections.join("\n\n"),
    );
    Ok((
        "You are a strategic customer experience consultant.".to_string(),
        prompt,
    ))
}
