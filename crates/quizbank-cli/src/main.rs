//! quizbank CLI — practice exams over a JSON question bank.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizbank", version, about = "Practice exam runner for a JSON question bank")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (bank, backups, session); overrides the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new practice test, replacing any test in progress
    Start {
        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Show the current question
    Show,

    /// Answer the current question and move to the next one
    Answer {
        /// Selected letters, e.g. `A C` or `A,C`; none skips the question
        letters: Vec<String>,
    },

    /// Score the current test
    Results {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Abandon the current test and show the bank summary
    Home,

    /// Manage bank backups
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },

    /// Replace the local bank with the remote copy (backs up first)
    Update,

    /// Print one question as JSON, ready to edit and feed back to `edit`
    Question {
        /// 0-based index of the question in the bank
        index: usize,
    },

    /// Replace one question with the JSON object in a file
    Edit {
        /// 0-based index of the question in the bank
        #[arg(long)]
        index: usize,

        /// File holding the replacement question
        #[arg(long)]
        from: PathBuf,
    },

    /// Check the bank for malformed or duplicate questions
    Validate {
        /// Bank file to check (default: the configured bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum BackupAction {
    /// Back up the bank now
    Create,
    /// List the newest backups
    List,
    /// Restore a backup by id (YYYYMMDD_HHMM)
    Restore { id: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizbank=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let app = || commands::App::load(cli.config.as_deref(), cli.data_dir.clone());

    let result = match cli.command {
        Commands::Start { count } => app().and_then(|app| commands::exam::start(&app, count)),
        Commands::Show => app().and_then(|app| commands::exam::show(&app)),
        Commands::Answer { ref letters } => {
            app().and_then(|app| commands::exam::answer(&app, letters))
        }
        Commands::Results { json } => app().and_then(|app| commands::exam::results(&app, json)),
        Commands::Home => app().and_then(|app| commands::exam::home(&app)),
        Commands::Backup { ref action } => app().and_then(|app| match action {
            BackupAction::Create => commands::backup::create(&app),
            BackupAction::List => commands::backup::list(&app),
            BackupAction::Restore { id } => commands::backup::restore(&app, id),
        }),
        Commands::Update => match app() {
            Ok(app) => commands::update::execute(&app).await,
            Err(e) => Err(e),
        },
        Commands::Question { index } => {
            app().and_then(|app| commands::edit::show(&app, index))
        }
        Commands::Edit { index, ref from } => {
            app().and_then(|app| commands::edit::execute(&app, index, from))
        }
        Commands::Validate { ref bank } => {
            app().and_then(|app| commands::validate::execute(&app, bank.as_deref()))
        }
        Commands::Init => commands::init::execute(cli.config.as_deref(), cli.data_dir.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
