use anyhow::Result;
use quiz_core::model::TagSet;

use super::Context;

pub async fn execute(ctx: &Context) -> Result<()> {
    let bank = ctx.services().await?.generator().load_bank().await?;
    let catalog = bank.tag_catalog();
    if catalog.is_empty() {
        println!("No questions found. Import a CSV bank first.");
        return Ok(());
    }

    let width = catalog.iter().map(|t| t.as_str().len()).max().unwrap_or(0);
    for tag in &catalog {
        let count = bank.matching_count(&TagSet::from([tag.clone()]));
        println!("{:<width$}  {count:>5}", tag.as_str());
    }
    println!("\n{} questions, {} tags.", bank.len(), catalog.len());
    if !bank.rejected().is_empty() {
        println!("{} rows were rejected as invalid.", bank.rejected().len());
    }
    Ok(())
}
