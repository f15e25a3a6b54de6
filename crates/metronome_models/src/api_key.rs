//! OpenAI API key handling.

use metronome_error::{OpenAIError, OpenAIErrorKind, OpenAIResult};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A validated OpenAI API key.
///
/// The `Debug` output is redacted so keys never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Environment variable the key is read from.
    pub const ENV_VAR: &'static str = "OPENAI_API_KEY";

    /// Normalize and validate a raw key.
    ///
    /// Surrounding whitespace and any quote characters are stripped, which
    /// tolerates keys pasted into `.env` files as `"sk-..."`.
    ///
    /// # Errors
    ///
    /// `MissingApiKey` when nothing is left after stripping,
    /// `InvalidApiKeyFormat` when the key lacks an `sk-` or `org-` prefix.
    pub fn parse(raw: &str) -> OpenAIResult<Self> {
        let key: String = raw.trim().chars().filter(|c| !matches!(c, '"' | '\'')).collect();
        let key = key.trim();

        if key.is_empty() {
            return Err(OpenAIError::new(OpenAIErrorKind::MissingApiKey));
        }
        if !(key.starts_with("sk-") || key.starts_with("org-")) {
            return Err(OpenAIError::new(OpenAIErrorKind::InvalidApiKeyFormat));
        }

        Ok(Self(key.to_string()))
    }

    /// Read and validate the key from [`ApiKey::ENV_VAR`].
    pub fn from_env() -> OpenAIResult<Self> {
        let raw = std::env::var(Self::ENV_VAR)
            .map_err(|_| OpenAIError::new(OpenAIErrorKind::MissingApiKey))?;
        debug!("Loaded API key from environment");
        Self::parse(&raw)
    }

    /// The key itself, for the authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(3).collect();
        write!(f, "ApiKey({prefix}***)")
    }
}

impl FromStr for ApiKey {
    type Err = OpenAIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
