//! Auto-detection of rate limits from API response headers.
//!
//! OpenAI reports the account's actual limits on every response. Comparing
//! them against the configured tier tells the operator when the pacer is
//! set looser or tighter than the remote service.

use crate::tiers::OpenAITier;
use crate::{Tier, TierConfig};
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Detects and caches rate limits from API response headers.
///
/// # Example
///
/// ```rust,ignore
/// use metronome_rate_limit::HeaderRateLimitDetector;
///
/// let detector = HeaderRateLimitDetector::new();
///
/// if let Some(tier_config) = detector.detect_openai(response.headers()).await {
///     println!("Detected tier: {}", tier_config.name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HeaderRateLimitDetector {
    detected_limits: Arc<RwLock<Option<TierConfig>>>,
}

impl HeaderRateLimitDetector {
    /// Create a new header rate limit detector.
    #[instrument]
    pub fn new() -> Self {
        debug!("Creating new header rate limit detector");
        Self {
            detected_limits: Arc::new(RwLock::new(None)),
        }
    }

    /// Detect rate limits from OpenAI response headers.
    ///
    /// Reads `x-ratelimit-limit-requests`. Returns `None` when the header is
    /// absent or unparseable, leaving the cache untouched.
    ///
    /// The detected tier carries no burst limit, since OpenAI does not
    /// publish one.
    #[instrument(skip(self, headers))]
    pub async fn detect_openai(&self, headers: &HeaderMap) -> Option<TierConfig> {
        let rpm = parse_header_u32(headers, "x-ratelimit-limit-requests")?;
        let remaining = parse_header_u32(headers, "x-ratelimit-remaining-requests");
        debug!(rpm, ?remaining, "Detected OpenAI rate limits");

        let name = OpenAITier::from_rpm(rpm)
            .map(|tier| tier.name().to_string())
            .unwrap_or_else(|| "Custom".to_string());

        let config = TierConfig {
            name,
            rpm: Some(rpm),
            burst: None,
            models: HashMap::new(),
        };

        *self.detected_limits.write().await = Some(config.clone());

        Some(config)
    }

    /// Get last detected limits from cache.
    #[instrument(skip(self))]
    pub async fn get_cached(&self) -> Option<TierConfig> {
        let cached = self.detected_limits.read().await.clone();
        debug!(has_cached = cached.is_some(), "Retrieving cached rate limits");
        cached
    }

    /// Clear the cached detected limits.
    #[instrument(skip(self))]
    pub async fn clear_cache(&self) {
        debug!("Clearing cached rate limits");
        *self.detected_limits.write().await = None;
    }
}

impl Default for HeaderRateLimitDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_header_u32(headers: &HeaderMap, key: &str) -> Option<u32> {
    headers.get(key)?.to_str().ok()?.trim().parse().ok()
}
