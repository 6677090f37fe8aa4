//! korrektur CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "korrektur", version, about = "Criterion-based exam grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a batch of solutions against a rubric
    Grade {
        /// Path to the rubric .toml file
        #[arg(long)]
        rubric: PathBuf,

        /// Path to a solutions .toml file or directory
        #[arg(long)]
        solutions: PathBuf,

        /// Max submissions graded concurrently
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Per-submission timeout in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Output directory for the JSON report
        #[arg(long, default_value = "./korrektur-results")]
        output: PathBuf,
    },

    /// Validate a rubric file
    Validate {
        /// Path to the rubric .toml file
        #[arg(long)]
        rubric: PathBuf,
    },

    /// Create a starter rubric and example solutions
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("korrektur=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            rubric,
            solutions,
            concurrency,
            timeout_secs,
            output,
        } => commands::grade::execute(rubric, solutions, concurrency, timeout_secs, output).await,
        Commands::Validate { rubric } => commands::validate::execute(rubric),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
