//! The `quizbank backup` subcommands.

use anyhow::Result;
use comfy_table::Table;

use super::App;

pub fn create(app: &App) -> Result<()> {
    let outcome = app.admin()?.create_backup();
    anyhow::ensure!(outcome.success, outcome.message);
    println!("{}", outcome.message);
    Ok(())
}

pub fn list(app: &App) -> Result<()> {
    let backups = app.admin()?.list_backups();
    if backups.is_empty() {
        println!("No backups in {}", app.backups.dir().display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Created", "File"]);
    for b in &backups {
        table.add_row(vec![
            b.timestamp.clone(),
            b.display_date.clone(),
            b.path.display().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn restore(app: &App, id: &str) -> Result<()> {
    let admin = app.admin()?;
    let mut session = app.load_session();
    let outcome = admin.restore(id, &mut session);
    anyhow::ensure!(outcome.success, outcome.message);
    app.save_session(&session)?;
    println!("{}", outcome.message);
    Ok(())
}
