//! The `quizbank validate` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizbank_core::parser::{parse_bank, validate_bank};

use super::App;

pub fn execute(app: &App, bank_path: Option<&Path>) -> Result<()> {
    let path = bank_path.map_or_else(|| app.config.bank_path(), Path::to_path_buf);
    let content =
        std::fs::read(&path).with_context(|| format!("failed to read bank: {}", path.display()))?;
    let bank =
        parse_bank(&content).with_context(|| format!("failed to parse bank: {}", path.display()))?;

    println!("Bank: {} ({} questions)", path.display(), bank.len());

    let warnings = validate_bank(&bank);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.index, w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
