//! Metronome CLI binary.
//!
//! This binary provides command-line access to paced OpenAI requests:
//! - Ask a single question
//! - Run a file of prompts concurrently under one pacer
//! - Check connectivity and inspect effective limits

use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, Commands, hint_for, load_settings, run_ask, run_batch, run_check, show_limits};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up OPENAI_API_KEY from .env when present
    dotenvy::dotenv().ok();

    metronome::telemetry::init_console_telemetry(cli.verbose);

    let outcome = match load_settings(&cli.pacing) {
        Ok(settings) => match &cli.command {
            Commands::Ask { prompt } => run_ask(&settings, prompt).await,
            Commands::Batch { file } => run_batch(&settings, file).await,
            Commands::Check => run_check(&settings).await,
            Commands::Limits => show_limits(&settings),
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = hint_for(&e) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
