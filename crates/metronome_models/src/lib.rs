//! Paced OpenAI client for Metronome.
//!
//! [`OpenAIClient`] consults a shared [`Pacer`](metronome_rate_limit::Pacer)
//! before every request, so any number of tasks holding clones of one client
//! stay under the configured tier's limits together.
//!
//! # Example
//!
//! ```no_run
//! use metronome_models::{ApiKey, OpenAIClient};
//! use metronome_rate_limit::{MetronomeConfig, Pacer};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MetronomeConfig::load()?;
//! let tier = config.resolve_tier("openai", None)?;
//! let pacer = Arc::new(Pacer::from_tier(&tier)?.with_mode(config.pacing.mode));
//!
//! let client = OpenAIClient::new(&config.client, ApiKey::from_env()?, pacer)?;
//! let reply = client.complete("What is the capital of France?").await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

mod api_key;
mod openai;

pub use api_key::ApiKey;
pub use openai::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChoiceMessage, OpenAIClient, Role, Usage,
};
