//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use metronome::{PacingMode, PacingOverrides};
use std::path::PathBuf;

/// Metronome - paced OpenAI requests that stay under per-minute and burst limits
#[derive(Parser, Debug)]
#[command(name = "metronome")]
#[command(about = "Paced OpenAI requests that stay under per-minute and burst limits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Pacing and client overrides
    #[command(flatten)]
    pub pacing: PacingArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Options layered over the configuration files.
#[derive(Args, Debug, Clone, Default)]
pub struct PacingArgs {
    /// Extra configuration file, applied last
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider whose tiers are used
    #[arg(long, global = true, default_value = "openai")]
    pub provider: String,

    /// Tier name (e.g. free, tier1); defaults to the provider's default tier
    #[arg(long, global = true)]
    pub tier: Option<String>,

    /// Requests per minute, overriding the tier
    #[arg(long, global = true)]
    pub rpm: Option<u32>,

    /// Burst limit, overriding the tier
    #[arg(long, global = true)]
    pub burst: Option<u32>,

    /// Pacing mode (reference or strict)
    #[arg(long, global = true)]
    pub mode: Option<PacingMode>,

    /// Model to request
    #[arg(long, global = true)]
    pub model: Option<String>,
}

impl PacingArgs {
    /// Overrides to apply on top of the loaded configuration.
    pub fn overrides(&self) -> PacingOverrides {
        PacingOverrides {
            provider: self.provider.clone(),
            tier: self.tier.clone(),
            model: self.model.clone(),
            rpm: self.rpm,
            burst: self.burst,
            mode: self.mode,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one prompt and print the reply
    Ask {
        /// Prompt text
        prompt: String,
    },

    /// Send every non-empty line of a file as its own prompt
    Batch {
        /// File with one prompt per line
        file: PathBuf,
    },

    /// Verify the API key and endpoint with a minimal request
    Check,

    /// Print the effective tier limits and pacing mode
    Limits,
}
