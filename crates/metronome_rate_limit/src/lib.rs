//! Request pacing for rate-limited LLM APIs.
//!
//! The centerpiece is [`Pacer`], a blocking gate consulted before every
//! outbound call. It enforces two caps over a trailing 60-second window:
//! a steady requests-per-minute cap and a burst cap.
//!
//! ```
//! use metronome_rate_limit::{ManualClock, Pacer};
//! use std::num::NonZeroU32;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let pacer = Pacer::new(NonZeroU32::new(3).unwrap(), NonZeroU32::new(5).unwrap())
//!     .with_clock(Arc::new(clock.clone()));
//!
//! for _ in 0..4 {
//!     pacer.await_slot();
//! }
//!
//! // The fourth call had to wait out the steady-rate window.
//! assert_eq!(clock.sleeps(), vec![Duration::from_secs(60)]);
//! ```
//!
//! Limits usually come from configuration rather than literals; see
//! [`MetronomeConfig`] and [`Pacer::from_tier`].

mod clock;
mod config;
mod detector;
mod pacer;
mod tier;
pub mod tiers;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::{ClientConfig, MetronomeConfig, ModelTierConfig, PacingConfig, ProviderConfig, TierConfig};
pub use detector::HeaderRateLimitDetector;
pub use pacer::{PacingMode, Pacer, WINDOW};
pub use tier::Tier;
