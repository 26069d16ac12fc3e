//! The `quizbank init` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizbank_remote::config::QuizbankConfig;

const HEADER: &str = "# quizbank configuration\n\
# Paths and URLs may reference environment variables as ${VAR}.\n\n";

pub fn execute(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or(Path::new("quizbank.toml"));
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }

    let mut config = QuizbankConfig::default();
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_path_buf();
    }
    let body = config.to_toml()?;
    std::fs::write(path, format!("{HEADER}{body}"))
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());

    println!("\nNext steps:");
    println!("  1. Put a question bank at {}", config.bank_path().display());
    println!("     (or run: quizbank update)");
    println!("  2. Run: quizbank validate");
    println!("  3. Run: quizbank start --count 10");

    Ok(())
}
