//! OpenAI request outcome classification.

/// OpenAI-specific error conditions.
///
/// These classify how a paced request failed. Nothing in the workspace
/// retries on them; `is_transient` only informs the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum OpenAIErrorKind {
    /// API key not found in environment
    #[display("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,
    /// API key present but malformed
    #[display("API key should start with 'sk-' or 'org-'")]
    InvalidApiKeyFormat,
    /// Prompt was empty after trimming
    #[display("Prompt is empty")]
    EmptyPrompt,
    /// Request could not be assembled
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Remote rejected the credentials (401/403)
    #[display("Authentication failed: {}", _0)]
    Authentication(String),
    /// Remote quota or rate limit rejection (429)
    #[display("Quota exceeded: {}", _0)]
    QuotaExceeded(String),
    /// Any other non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Transport failure (connect, timeout, reset)
    #[display("Network error: {}", _0)]
    Network(String),
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
    /// Response contained no choices
    #[display("Response contained no choices")]
    EmptyResponse,
}

impl OpenAIErrorKind {
    /// Whether the failure is likely to clear up on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            OpenAIErrorKind::HttpStatus { status_code, .. } => {
                matches!(*status_code, 408 | 500 | 502 | 503 | 504)
            }
            OpenAIErrorKind::Network(_) => true,
            _ => false,
        }
    }
}

/// OpenAI error with source location tracking.
///
/// # Examples
///
/// ```
/// use metronome_error::{OpenAIError, OpenAIErrorKind};
///
/// let err = OpenAIError::new(OpenAIErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("OpenAI Error: {} at line {} in {}", kind, line, file)]
pub struct OpenAIError {
    /// The kind of error that occurred
    pub kind: OpenAIErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl OpenAIError {
    /// Create a new OpenAIError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OpenAIErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OpenAIErrorKind {
        &self.kind
    }

    /// Whether the failure is likely to clear up on its own.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}

impl From<OpenAIErrorKind> for OpenAIError {
    #[track_caller]
    fn from(kind: OpenAIErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for OpenAI operations.
pub type OpenAIResult<T> = Result<T, OpenAIError>;
