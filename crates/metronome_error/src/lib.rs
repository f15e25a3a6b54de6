//! Error types for the Metronome workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The pacer itself never fails; these types cover configuration loading,
//! tier resolution and the outcome of the paced API calls.
//!
//! # Examples
//!
//! ```
//! use metronome_error::{MetronomeResult, HttpError};
//!
//! fn fetch_data() -> MetronomeResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod http;
mod openai;
mod rate_limit;

pub use config::ConfigError;
pub use error::{MetronomeError, MetronomeErrorKind, MetronomeResult};
pub use http::HttpError;
pub use openai::{OpenAIError, OpenAIErrorKind, OpenAIResult};
pub use rate_limit::{RateLimitError, RateLimitErrorKind, RateLimitResult};
