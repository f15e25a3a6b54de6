//! Configuration loading failures.
//!
//! Raised while layering `metronome.toml` sources, when a source is missing
//! or malformed, and by the CLI when an input file cannot be read.

/// A configuration source could not be read or did not deserialize.
///
/// The message names the offending source; the location points at the
/// loader call that gave up.
///
/// # Examples
///
/// ```
/// use metronome_error::{ConfigError, MetronomeResult};
///
/// fn pacing_mode(table: Option<&str>) -> MetronomeResult<&str> {
///     Ok(table.ok_or_else(|| ConfigError::new("missing [pacing] table in ./metronome.toml"))?)
/// }
///
/// let err = pacing_mode(None).unwrap_err();
/// assert!(err.to_string().contains("[pacing]"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong, including the source path when known
    pub message: String,
    /// Line of the loader call
    pub line: u32,
    /// File of the loader call
    pub file: &'static str,
}

impl ConfigError {
    /// Record a configuration failure at the caller's location.
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
