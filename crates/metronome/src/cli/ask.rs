//! Single prompt command handler.

use metronome::{ApiKey, EffectiveSettings, MetronomeResult};
use tracing::instrument;

/// Send one prompt and print the reply to stdout.
#[instrument(skip(settings, prompt))]
pub async fn run_ask(settings: &EffectiveSettings, prompt: &str) -> MetronomeResult<()> {
    let client = settings.client(ApiKey::from_env()?)?;
    let reply = client.complete(prompt).await?;
    println!("{}", reply);
    Ok(())
}
