//! `quiz`: terminal driver for tag-filtered problem sets.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use services::QuizConfig;

use crate::commands::Context;

mod commands;
mod db;

#[derive(Parser)]
#[command(name = "quiz", version, about = "Tag-filtered multiple-choice problem sets")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the `QUIZ_*` environment and the secrets submitted by the operator.
#[derive(Args)]
struct GlobalArgs {
    /// SQLite database URL or path
    #[arg(long, global = true)]
    db: Option<String>,

    /// Read questions from this CSV file instead of the database
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Generator access key (default: `QUIZ_ACCESS_KEY`)
    #[arg(long, global = true)]
    access_key: Option<String>,

    /// Password for saving results, history and adding questions (default: `QUIZ_PASSWORD`)
    #[arg(long, global = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tags in the question bank
    Tags,

    /// Generate a problem set and answer it in the terminal
    Run {
        /// Tag to draw from (repeatable)
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,

        /// Number of questions (default: every matching question)
        #[arg(long)]
        count: Option<usize>,

        /// Save the results without asking
        #[arg(long)]
        save: bool,

        /// Recorded run duration in seconds (default: measured)
        #[arg(long)]
        duration: Option<u64>,

        /// Do not ring the terminal bell on completion
        #[arg(long)]
        quiet: bool,
    },

    /// Import a CSV question bank into the database
    Import {
        /// CSV file with ID,Question,Choices,Answer,Tags columns
        path: PathBuf,
    },

    /// Show recently saved runs
    History {
        #[arg(long, default_value = "20")]
        limit: u32,
    },

    /// Add a question to the bank
    Add {
        #[arg(long)]
        question: String,

        /// Exactly four choices
        #[arg(long = "choice", num_args = 4, required = true)]
        choices: Vec<String>,

        #[arg(long)]
        answer: String,

        /// Tag (repeatable)
        #[arg(long = "tag", required = true)]
        tags: Vec<String>,
    },
}

impl GlobalArgs {
    fn into_context(self, mut config: QuizConfig) -> anyhow::Result<Context> {
        if let Some(db) = self.db {
            config.db_url = db::normalize_sqlite_url(&db)?;
        }
        if self.csv.is_some() {
            config.qna_csv = self.csv;
        }
        let access_key = self.access_key.or_else(|| config.access_key.clone());
        let password = self.password.or_else(|| config.password.clone());
        Ok(Context {
            config,
            access_key,
            password,
        })
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = cli.global.into_context(QuizConfig::from_env()?)?;
    db::prepare_sqlite_file(&ctx.config.db_url)?;

    match cli.command {
        Commands::Tags => commands::tags::execute(&ctx).await,
        Commands::Run {
            tags,
            count,
            save,
            duration,
            quiet,
        } => {
            let options = commands::run::RunOptions {
                count,
                save,
                duration,
                quiet,
            };
            commands::run::execute(&ctx, tags, options).await
        }
        Commands::Import { path } => commands::import::execute(&ctx, path).await,
        Commands::History { limit } => commands::history::execute(&ctx, limit).await,
        Commands::Add {
            question,
            choices,
            answer,
            tags,
        } => commands::add::execute(&ctx, question, choices, answer, tags).await,
    }
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quiz=info,services=info,storage=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
