//! The exam subcommands: `start`, `show`, `answer`, `results`, `home`.

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizbank_core::exam::{Navigation, QuestionView};
use quizbank_core::scoring::ScoreReport;

use super::App;

pub fn start(app: &App, count: Option<usize>) -> Result<()> {
    let exam = app.exam();
    let mut session = app.load_session();
    let count = count.unwrap_or(app.config.default_question_count);

    let nav = exam.start(&mut session, count)?;
    app.save_session(&session)?;
    print_navigation(&nav);
    Ok(())
}

pub fn show(app: &App) -> Result<()> {
    let mut session = app.load_session();
    let nav = app.exam().view_current(&mut session);
    app.save_session(&session)?;
    print_navigation(&nav);
    Ok(())
}

pub fn answer(app: &App, letters: &[String]) -> Result<()> {
    let letters: Vec<&str> = letters
        .iter()
        .flat_map(|l| l.split(','))
        .map(str::trim)
        .collect();

    let mut session = app.load_session();
    let nav = app.exam().submit_and_advance(&mut session, letters);
    app.save_session(&session)?;
    print_navigation(&nav);
    Ok(())
}

pub fn results(app: &App, json: bool) -> Result<()> {
    let session = app.load_session();
    let report = app.exam().view_results(&session)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

pub fn home(app: &App) -> Result<()> {
    let mut session = app.load_session();
    let view = app.exam().home(&mut session);
    app.save_session(&session)?;

    println!("Question bank: {} questions", view.total_questions);
    let options: Vec<String> = view.count_options.iter().map(usize::to_string).collect();
    println!("Test lengths: {}", options.join(", "));
    println!("Start with: quizbank start --count <N>");
    Ok(())
}

fn print_navigation(nav: &Navigation) {
    match nav {
        Navigation::Question(view) => print_question(view),
        Navigation::Results => {
            println!("Test complete. See your score with: quizbank results");
        }
        Navigation::Home { reason } => {
            println!("Returning home: {reason}");
            println!("Start a new test with: quizbank start");
        }
    }
}

fn print_question(view: &QuestionView) {
    match &view.ksa {
        Some(ksa) => println!("Question {} of {}  [{ksa}]", view.position + 1, view.total),
        None => println!("Question {} of {}", view.position + 1, view.total),
    }
    println!();
    println!("{}", view.question);
    println!();
    for choice in &view.choices {
        // Bank choices usually carry their own "A." label.
        if choice.text.starts_with(&format!("{}.", choice.letter)) {
            println!("  {}", choice.text);
        } else {
            println!("  {}. {}", choice.letter, choice.text);
        }
    }
    if view.multi_select {
        println!("\n(select all that apply)");
    }
    if !view.previous_answer.is_empty() {
        println!("Previous answer: {}", view.previous_answer.join(", "));
    }
}

fn print_report(report: &ScoreReport) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct", "Result"]);

    for r in &report.results {
        let answered = if r.user_answers.is_empty() {
            "-".to_string()
        } else {
            r.user_answers.join(", ")
        };
        table.add_row(vec![
            Cell::new(r.position + 1),
            Cell::new(truncate(&r.question, 60)),
            Cell::new(answered),
            Cell::new(r.correct_answers.join(", ")),
            Cell::new(if r.is_correct { "correct" } else { "wrong" }),
        ]);
    }

    println!("{table}");
    println!(
        "Score: {:.1}% ({}/{} correct)",
        report.score_percent, report.correct_count, report.scored_count
    );
    println!("Time: {}", report.elapsed_display());
    if !report.skipped.is_empty() {
        println!(
            "{} question(s) skipped because the bank changed during the test.",
            report.skipped.len()
        );
    }

    let missed: Vec<_> = report.results.iter().filter(|r| !r.is_correct).collect();
    if !missed.is_empty() {
        println!("\nReview:");
    }
    for r in missed {
        println!("\n{}. {}", r.position + 1, r.question);
        if !r.explanation.is_empty() {
            println!("   {}", r.explanation);
        }
        for citation in &r.regulations {
            println!("   {} {} {}", citation.id, citation.section, citation.title);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
