mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gavel-cli")]
#[command(about = "Gavel CLI - Run judge submissions locally without the HTTP service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a local source file through the judge engine
    Run {
        /// Source file (language inferred from the extension)
        file: PathBuf,

        /// Language tag (c, cpp, py); overrides extension inference
        #[arg(short, long)]
        language: Option<String>,

        /// File streamed as the program's stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Literal text supplied as the program's stdin
        #[arg(long, conflicts_with = "input")]
        stdin: Option<String>,

        /// Wall-clock budget in milliseconds (defaults to the per-language limit)
        #[arg(short, long)]
        time_limit_ms: Option<u64>,

        /// Print the raw execution result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            language,
            input,
            stdin,
            time_limit_ms,
            json,
        } => {
            commands::run_file(&file, language.as_deref(), input, stdin, time_limit_ms, json)
                .await?;
        }
    }

    Ok(())
}
