//! Configuration structures for pacing and the API client.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from metronome.toml)
//! - User overrides (./metronome.toml or ~/.config/metronome/metronome.toml)
//! - Automatic merging with user values taking precedence

use crate::{PacingMode, Tier};
use config::{Config, File, FileFormat};
use metronome_error::{
    ConfigError, MetronomeError, MetronomeResult, RateLimitError, RateLimitErrorKind,
    RateLimitResult,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../metronome.toml");

/// Model-specific pacing overrides.
///
/// ```toml
/// [providers.openai.tiers.tier1.models."gpt-4o"]
/// rpm = 200
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Burst limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,
}

/// Configuration for a specific API tier.
///
/// ```toml
/// [providers.openai.tiers.free]
/// name = "Free"
/// rpm = 3
/// burst = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Tier 1")
    pub name: String,

    /// Requests per minute limit
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Burst limit; defaults to `rpm` when absent
    #[serde(default)]
    pub burst: Option<u32>,

    /// Model-specific overrides
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn burst(&self) -> Option<u32> {
        self.burst
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Get a tier configuration with model-specific overrides applied.
    ///
    /// Returns a clone of the tier-level config when the model has no
    /// overrides.
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        match self.models.get(model_name) {
            Some(model_config) => TierConfig {
                name: self.name.clone(),
                rpm: model_config.rpm.or(self.rpm),
                burst: model_config.burst.or(self.burst),
                models: HashMap::new(),
            },
            None => self.clone(),
        }
    }
}

/// Configuration for a specific provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    pub tiers: HashMap<String, TierConfig>,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientConfig {
    /// API root; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model requested when the caller does not name one
    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum spacing between consecutive requests in milliseconds (0 disables)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_min_request_interval_ms() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

/// Pacer behavior settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct PacingConfig {
    /// Wait computation policy
    #[serde(default)]
    pub mode: PacingMode,
}

/// Top-level Metronome configuration.
///
/// # Example
///
/// ```no_run
/// use metronome_rate_limit::MetronomeConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MetronomeConfig::load()?;
/// let tier = config.get_tier("openai", Some("free")).unwrap();
/// println!("OpenAI free tier RPM: {:?}", tier.rpm);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct MetronomeConfig {
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Pacer settings
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl MetronomeConfig {
    /// Load configuration from a specific file path only.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> MetronomeResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                MetronomeError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MetronomeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (metronome.toml shipped with the library)
    /// 2. User config in home directory (~/.config/metronome/metronome.toml)
    /// 3. User config in current directory (./metronome.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> MetronomeResult<Self> {
        Self::load_with(None)
    }

    /// Like [`MetronomeConfig::load`], with an extra required file layered on top.
    ///
    /// # Errors
    ///
    /// Returns an error if `overlay` is given but missing, or if any source
    /// fails to parse.
    #[instrument]
    pub fn load_with(overlay: Option<&Path>) -> MetronomeResult<Self> {
        debug!("Loading configuration with precedence: overlay > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/metronome/metronome.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("metronome").required(false));

        if let Some(path) = overlay {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .build()
            .map_err(|e| {
                MetronomeError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                MetronomeError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Get tier configuration for a provider.
    ///
    /// Uses the provider's default tier when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }

    /// Like [`MetronomeConfig::get_tier`], but says what was missing.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` or `UnknownTier`.
    pub fn resolve_tier(&self, provider: &str, tier_name: Option<&str>) -> RateLimitResult<TierConfig> {
        let provider_config = self.providers.get(provider).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::UnknownProvider(provider.to_string()))
        })?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        provider_config.tiers.get(tier).cloned().ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::UnknownTier {
                provider: provider.to_string(),
                tier: tier.to_string(),
            })
        })
    }
}
