//! Rate limit configuration errors.
//!
//! Pacing itself cannot fail; these errors arise only while turning a tier
//! description into concrete pacer limits.

/// Rate limit error conditions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum RateLimitErrorKind {
    /// Tier cannot be turned into pacer limits.
    #[display("Invalid tier '{}': {}", tier, reason)]
    InvalidTier {
        /// Tier name
        tier: String,
        /// Why the tier is unusable
        reason: String,
    },
    /// Provider not present in configuration.
    #[display("Unknown provider: {}", _0)]
    UnknownProvider(String),
    /// Tier not present for a known provider.
    #[display("Unknown tier '{}' for provider '{}'", tier, provider)]
    UnknownTier {
        /// Provider name
        provider: String,
        /// Requested tier name
        tier: String,
    },
}

/// Rate limit error with location tracking.
///
/// # Examples
///
/// ```
/// use metronome_error::{RateLimitError, RateLimitErrorKind};
///
/// let err = RateLimitError::new(RateLimitErrorKind::UnknownProvider("acme".into()));
/// assert!(format!("{}", err).contains("acme"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Rate Limit Error: {} at line {} in {}", kind, line, file)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new rate limit error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }
}

impl From<RateLimitErrorKind> for RateLimitError {
    #[track_caller]
    fn from(kind: RateLimitErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for rate limit configuration.
pub type RateLimitResult<T> = Result<T, RateLimitError>;
