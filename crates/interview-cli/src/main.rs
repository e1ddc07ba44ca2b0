//! interview CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "interview", version, about = "Mock technical interview scorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interview session
    Run {
        /// Role to draw questions for (e.g. "backend")
        #[arg(long)]
        role: String,

        /// Experience level (junior, mid, senior)
        #[arg(long)]
        experience: Option<String>,

        /// Question catalog JSON (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// JSON array of answers, in question order. Reads stdin lines if absent
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Output directory (overrides config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a single answer
    Score {
        /// Catalog id of the question
        #[arg(long)]
        question_id: usize,

        /// The candidate's answer
        #[arg(long)]
        answer: String,

        /// Session id recorded on the evaluation. Stores live only for this
        /// process, so it never joins a `run` session's summary
        #[arg(long)]
        session: Option<String>,

        /// Question catalog JSON (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List catalog questions
    Questions {
        /// Filter by role
        #[arg(long)]
        role: Option<String>,

        /// Filter by experience level
        #[arg(long)]
        experience: Option<String>,

        /// Pick one random question for the experience level
        #[arg(long)]
        random: bool,

        /// Question catalog JSON (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question catalog
    Validate {
        /// Question catalog JSON (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check that the similarity service is reachable
    Health {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example catalog
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("interview=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            role,
            experience,
            catalog,
            answers,
            output,
            format,
            config,
        } => {
            commands::run::execute(role, experience, catalog, answers, output, format, config)
                .await
        }
        Commands::Score {
            question_id,
            answer,
            session,
            catalog,
            config,
        } => commands::score::execute(question_id, answer, session, catalog, config).await,
        Commands::Questions {
            role,
            experience,
            random,
            catalog,
            config,
        } => commands::questions::execute(role, experience, random, catalog, config),
        Commands::Validate { catalog, config } => commands::validate::execute(catalog, config),
        Commands::Health { config } => commands::health::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
