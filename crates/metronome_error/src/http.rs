//! HTTP client construction failures.

/// The HTTP client behind a paced caller could not be set up.
///
/// Transport failures on individual requests are classified as
/// [`OpenAIErrorKind::Network`](crate::OpenAIErrorKind::Network) instead;
/// this type only covers building the client itself, e.g. when the TLS
/// backend fails to initialize.
///
/// # Examples
///
/// ```
/// use metronome_error::{HttpError, MetronomeError, MetronomeErrorKind};
///
/// let err: MetronomeError = HttpError::new("Failed to build HTTP client: no TLS backend").into();
/// assert!(matches!(err.kind(), MetronomeErrorKind::Http(_)));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// Builder failure reported by the HTTP stack
    pub message: String,
    /// Line where construction failed
    pub line: u32,
    /// File where construction failed
    pub file: &'static str,
}

impl HttpError {
    /// Record a client construction failure at the caller's location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
