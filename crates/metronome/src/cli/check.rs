//! Connection check command handler.

use metronome::{ApiKey, EffectiveSettings, MetronomeResult};
use tracing::instrument;

const TROUBLESHOOTING: &[&str] = &[
    "Make sure OPENAI_API_KEY is set and starts with 'sk-' or 'org-'.",
    "Check that the key is active at https://platform.openai.com/api-keys.",
    "Confirm the account has remaining quota and a valid payment method.",
    "Verify network access to the configured base URL.",
];

/// Send a minimal request and report whether it worked.
#[instrument(skip(settings))]
pub async fn run_check(settings: &EffectiveSettings) -> MetronomeResult<()> {
    println!(
        "Checking {} with model {}...",
        settings.client.base_url, settings.client.model
    );

    let outcome: MetronomeResult<String> = match ApiKey::from_env() {
        Ok(key) => match settings.client(key) {
            Ok(client) => client.check_connection().await.map_err(Into::into),
            Err(e) => Err(e),
        },
        Err(e) => Err(e.into()),
    };

    match outcome {
        Ok(reply) => {
            println!("Connection OK. Model replied: {}", reply.trim());
            Ok(())
        }
        Err(e) => {
            println!("Connection check failed.");
            println!("Troubleshooting:");
            for (i, step) in TROUBLESHOOTING.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            Err(e)
        }
    }
}
