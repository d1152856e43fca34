use anyhow::{Result, anyhow};
use quiz_core::model::{DRAFT_CHOICES, QuestionDraft};

use super::Context;

pub async fn execute(
    ctx: &Context,
    question: String,
    choices: Vec<String>,
    answer: String,
    tags: Vec<String>,
) -> Result<()> {
    let choices: [String; DRAFT_CHOICES] = choices
        .try_into()
        .map_err(|given: Vec<String>| anyhow!("expected {DRAFT_CHOICES} choices, got {}", given.len()))?;

    let app = ctx.services().await?;
    let access = ctx.access(&app.gate());
    let draft = QuestionDraft {
        question,
        choices,
        answer,
        tags,
    };
    let record = app.question_form().submit(access, draft).await?;
    println!("Added question #{}.", record.id());
    Ok(())
}
