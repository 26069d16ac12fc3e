//! The `quizbank question` and `quizbank edit` commands.

use std::path::Path;

use anyhow::{Context, Result};

use quizbank_core::model::Question;

use super::App;

pub fn show(app: &App, index: usize) -> Result<()> {
    let question = app
        .admin()?
        .question(index)
        .with_context(|| format!("question {index} not found"))?;
    println!("{}", serde_json::to_string_pretty(&question)?);
    Ok(())
}

pub fn execute(app: &App, index: usize, from: &Path) -> Result<()> {
    let content = std::fs::read_to_string(from)
        .with_context(|| format!("failed to read {}", from.display()))?;
    let question: Question = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a question object", from.display()))?;

    let outcome = app.admin()?.edit_question(index, question);
    anyhow::ensure!(outcome.success, outcome.message);
    println!("{}", outcome.message);
    Ok(())
}
