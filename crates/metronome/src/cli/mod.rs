//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the metronome binary.

mod ask;
mod batch;
mod check;
mod commands;
mod hints;
mod limits;

pub use ask::run_ask;
pub use batch::run_batch;
pub use check::run_check;
pub use commands::{Cli, Commands, PacingArgs};
pub use hints::hint_for;
pub use limits::show_limits;

use metronome::{EffectiveSettings, MetronomeConfig, MetronomeResult};

/// Load configuration and apply command-line overrides.
pub fn load_settings(args: &PacingArgs) -> MetronomeResult<EffectiveSettings> {
    let config = MetronomeConfig::load_with(args.config.as_deref())?;
    args.overrides().apply(&config)
}
