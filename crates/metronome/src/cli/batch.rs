//! Batch command handler.
//!
//! Every prompt gets its own task, and all tasks share one client and
//! therefore one pacer. Replies are printed in input order regardless of
//! completion order.

use metronome::{ApiKey, ConfigError, EffectiveSettings, MetronomeResult, OpenAIError};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Prompts in `text`: trimmed, one per non-empty line.
fn prompts(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Run every prompt in `file` concurrently under one pacer.
///
/// Failures are printed next to their prompt number; the first one is
/// returned once all prompts have finished.
#[instrument(skip(settings), fields(file = %file.display()))]
pub async fn run_batch(settings: &EffectiveSettings, file: &Path) -> MetronomeResult<()> {
    let text = tokio::fs::read_to_string(file).await.map_err(|e| {
        ConfigError::new(format!("Failed to read prompts from {}: {}", file.display(), e))
    })?;
    let prompts = prompts(&text);
    if prompts.is_empty() {
        warn!("No prompts found");
        return Ok(());
    }

    let client = settings.client(ApiKey::from_env()?)?;
    info!(count = prompts.len(), "Dispatching prompts");

    let handles: Vec<_> = prompts
        .into_iter()
        .map(|prompt| {
            let client = client.clone();
            tokio::spawn(async move { client.complete(&prompt).await })
        })
        .collect();

    let mut first_error: Option<OpenAIError> = None;
    for (index, handle) in handles.into_iter().enumerate() {
        let number = index + 1;
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        };
        match outcome {
            Ok(reply) => println!("[{}] {}", number, reply),
            Err(e) => {
                println!("[{}] error: {}", number, e.kind());
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
