//! Top-level error wrapper types.

use crate::{ConfigError, HttpError, OpenAIError, RateLimitError};

/// Every failure the workspace can report.
///
/// # Examples
///
/// ```
/// use metronome_error::{MetronomeError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MetronomeError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MetronomeErrorKind {
    /// HTTP client error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Tier resolution error
    #[from(RateLimitError)]
    RateLimit(RateLimitError),
    /// Classified API request failure
    #[from(OpenAIError)]
    OpenAI(OpenAIError),
}

/// Metronome error with kind discrimination.
///
/// # Examples
///
/// ```
/// use metronome_error::{MetronomeResult, ConfigError};
///
/// fn might_fail() -> MetronomeResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Metronome Error: {}", _0)]
pub struct MetronomeError(Box<MetronomeErrorKind>);

impl MetronomeError {
    /// Create a new error from a kind.
    pub fn new(kind: MetronomeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MetronomeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MetronomeErrorKind
impl<T> From<T> for MetronomeError
where
    T: Into<MetronomeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Metronome operations.
pub type MetronomeResult<T> = std::result::Result<T, MetronomeError>;
