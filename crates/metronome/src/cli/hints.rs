//! Operator guidance for classified failures.

use metronome::{MetronomeError, MetronomeErrorKind, OpenAIErrorKind};

const BILLING_URL: &str = "https://platform.openai.com/account/billing";

/// A one-line suggestion for the failure, if there is a useful one.
pub fn hint_for(error: &MetronomeError) -> Option<String> {
    let MetronomeErrorKind::OpenAI(openai) = error.kind() else {
        return None;
    };

    match openai.kind() {
        OpenAIErrorKind::MissingApiKey => {
            Some("Set OPENAI_API_KEY in the environment or in a .env file.".to_string())
        }
        OpenAIErrorKind::InvalidApiKeyFormat => {
            Some("OpenAI keys start with 'sk-' or 'org-'; check for stray characters.".to_string())
        }
        OpenAIErrorKind::Authentication(_) => {
            Some("Verify that your API key is correct and has not been revoked.".to_string())
        }
        OpenAIErrorKind::QuotaExceeded(_) => Some(format!(
            "Check your plan and billing details at {}, or lower --rpm.",
            BILLING_URL
        )),
        kind if kind.is_transient() => {
            Some("The failure looks temporary; try again shortly.".to_string())
        }
        _ => None,
    }
}
