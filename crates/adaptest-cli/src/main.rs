//! adaptest CLI: the request boundary and operator commands.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "adaptest",
    version,
    about = "Computerized adaptive testing engine (3PL IRT)"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Item bank file or directory (overrides config and ADAPTEST_BANK)
    #[arg(long, global = true)]
    bank: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one JSON request and print one JSON response
    Handle {
        /// Request file (default: stdin)
        #[arg(long)]
        request: Option<PathBuf>,
    },

    /// Re-estimate ability from a response history
    Estimate {
        /// Current ability estimate
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        theta: f64,

        /// JSON file with `[{"id": ..., "correct": ...}]`, or "-" for stdin
        #[arg(long)]
        history: PathBuf,
    },

    /// Recommend the next item
    Recommend {
        /// Current ability estimate
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        theta: f64,

        /// Already answered item ids (comma-separated)
        #[arg(long)]
        answered: Option<String>,

        /// Topics to prefer (comma-separated)
        #[arg(long)]
        weak_topics: Option<String>,
    },

    /// Show candidate items ranked by information
    Rank {
        /// Ability to rank at
        #[arg(long, default_value = "0.0", allow_negative_numbers = true)]
        theta: f64,

        /// Already answered item ids (comma-separated)
        #[arg(long)]
        answered: Option<String>,

        /// Topics to prefer (comma-separated)
        #[arg(long)]
        weak_topics: Option<String>,

        /// Number of rows to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Validate an item bank
    Validate,

    /// Create starter config and example item bank
    Init,
}

#[tokio::main]
async fn main() {
    // stdout carries the response payload; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let source = commands::BankSource {
        config: cli.config,
        bank: cli.bank,
    };

    let result = match cli.command {
        Commands::Handle { request } => commands::handle::execute(source, request).await,
        Commands::Estimate { theta, history } => {
            commands::estimate::execute(source, theta, history).await
        }
        Commands::Recommend {
            theta,
            answered,
            weak_topics,
        } => commands::recommend::execute(source, theta, answered, weak_topics).await,
        Commands::Rank {
            theta,
            answered,
            weak_topics,
            limit,
        } => commands::rank::execute(source, theta, answered, weak_topics, limit).await,
        Commands::Validate => commands::validate::execute(source).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
