//! Metronome - paced access to rate-limited LLM APIs
//!
//! Metronome keeps a client under a provider's per-minute and burst request
//! limits by consulting a shared pacer before every call. Callers that would
//! exceed a limit are blocked until the trailing 60-second window has room.
//!
//! # Quick Start
//!
//! ```no_run
//! use metronome::{ApiKey, MetronomeConfig, PacingOverrides};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MetronomeConfig::load()?;
//! let settings = PacingOverrides::default().apply(&config)?;
//! let client = settings.client(ApiKey::from_env()?)?;
//!
//! println!("{}", client.complete("Say hello").await?);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `metronome-error` - Error types
//! - `metronome-rate-limit` - Pacer, clocks, tiers and configuration
//! - `metronome-models` - Paced OpenAI chat client
//!
//! This crate (`metronome`) re-exports everything for convenience.

pub use metronome_error::*;
pub use metronome_models::*;
pub use metronome_rate_limit::*;

mod settings;
pub mod telemetry;

pub use settings::{EffectiveSettings, PacingOverrides};
