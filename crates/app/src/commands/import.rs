use std::path::PathBuf;

use anyhow::{Context as _, Result};
use quiz_core::model::{QuestionBank, QuestionRecord};
use storage::csv_source::CsvQuestionSource;
use storage::repository::QuestionSource;
use storage::sqlite::SqliteRepository;

use super::Context;

pub async fn execute(ctx: &Context, path: PathBuf) -> Result<()> {
    let rows = CsvQuestionSource::new(&path)
        .load_rows()
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let bank = QuestionBank::from_rows(rows);
    for rejected in bank.rejected() {
        match rejected.id {
            Some(id) => println!("skipped row {} (#{id}): {}", rejected.row, rejected.error),
            None => println!("skipped row {}: {}", rejected.row, rejected.error),
        }
    }

    let repo = SqliteRepository::connect(&ctx.config.db_url).await?;
    repo.migrate().await?;
    let valid: Vec<_> = bank.records().iter().map(QuestionRecord::to_row).collect();
    let written = repo.import_rows(&valid).await?;

    println!(
        "Imported {written} questions ({} blank rows dropped, {} rejected).",
        bank.dropped(),
        bank.rejected().len()
    );
    Ok(())
}
