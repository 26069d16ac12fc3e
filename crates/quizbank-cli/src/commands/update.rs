//! The `quizbank update` command.

use anyhow::Result;

use super::App;

pub async fn execute(app: &App) -> Result<()> {
    let admin = app.admin()?;
    let mut session = app.load_session();
    eprintln!("Fetching questions from {}", app.config.remote_url);

    let outcome = admin.update_from_remote(&mut session).await;
    anyhow::ensure!(outcome.success, outcome.message);
    app.save_session(&session)?;
    println!("{}", outcome.message);
    Ok(())
}
