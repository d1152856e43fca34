use anyhow::{Result, bail};
use services::HistorySummary;

use super::Context;

pub async fn execute(ctx: &Context, limit: u32) -> Result<()> {
    let app = ctx.services().await?;
    let access = ctx.access(&app.gate());
    if !access.authorized {
        bail!("history requires --password or QUIZ_PASSWORD");
    }

    let rows = app.results().history(access, limit).await?;
    if rows.is_empty() {
        println!("No saved runs yet.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<10}  {:>7}  {:>8}  {:>8}  {:>6}  tags",
        "run", "date", "score", "accuracy", "duration", "streak"
    );
    for row in &rows {
        let r = &row.record;
        println!(
            "{:>5}  {:<10}  {:>7}  {:>7.2}%  {:>7}s  {:>6}  {}",
            row.id,
            r.date,
            format!("{}/{}", r.score, r.total),
            r.accuracy * 100.0,
            r.duration_seconds,
            r.max_streak,
            r.run_tags
        );
    }

    let summary = HistorySummary::from_rows(&rows);
    if let Some(accuracy) = summary.accuracy() {
        println!(
            "\n{} runs, {}/{} correct ({:.2}%), best streak {}.",
            summary.runs,
            summary.correct,
            summary.questions,
            accuracy * 100.0,
            summary.best_streak
        );
    }
    Ok(())
}
