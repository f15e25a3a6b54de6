//! Command-line overrides layered on top of loaded configuration.

use metronome_error::{MetronomeResult, RateLimitResult};
use metronome_models::{ApiKey, OpenAIClient};
use metronome_rate_limit::{ClientConfig, MetronomeConfig, Pacer, PacingMode, TierConfig};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Values that take precedence over the configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingOverrides {
    /// Provider whose tiers are consulted
    pub provider: String,
    /// Tier name; the provider's default tier when `None`
    pub tier: Option<String>,
    /// Model name; also selects model-specific tier limits
    pub model: Option<String>,
    /// Requests per minute, replacing the tier's value
    pub rpm: Option<u32>,
    /// Burst limit, replacing the tier's value
    pub burst: Option<u32>,
    /// Pacing mode, replacing `[pacing] mode`
    pub mode: Option<PacingMode>,
}

impl Default for PacingOverrides {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            tier: None,
            model: None,
            rpm: None,
            burst: None,
            mode: None,
        }
    }
}

impl PacingOverrides {
    /// Resolve the tier and apply every override.
    ///
    /// Precedence for limits: explicit `rpm`/`burst` > model-specific tier
    /// limits > tier limits.
    ///
    /// # Errors
    ///
    /// Returns a rate-limit error if the provider or tier is unknown.
    #[instrument(skip(config))]
    pub fn apply(&self, config: &MetronomeConfig) -> MetronomeResult<EffectiveSettings> {
        let mut client = config.client.clone();
        if let Some(model) = &self.model {
            client.model = model.clone();
        }

        let mut tier = config
            .resolve_tier(&self.provider, self.tier.as_deref())?
            .for_model(&client.model);
        if let Some(rpm) = self.rpm {
            tier.rpm = Some(rpm);
        }
        if let Some(burst) = self.burst {
            tier.burst = Some(burst);
        }

        let mode = self.mode.unwrap_or(config.pacing.mode);
        debug!(tier = %tier.name, rpm = ?tier.rpm, burst = ?tier.burst, %mode, "Resolved pacing settings");

        Ok(EffectiveSettings {
            provider: self.provider.clone(),
            tier,
            mode,
            client,
        })
    }
}

/// Fully resolved pacing and client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSettings {
    /// Provider the tier came from
    pub provider: String,
    /// Tier limits after overrides
    pub tier: TierConfig,
    /// Pacing mode
    pub mode: PacingMode,
    /// HTTP client settings after overrides
    pub client: ClientConfig,
}

impl EffectiveSettings {
    /// Build the pacer these settings describe.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTier` if the limits are missing or zero.
    pub fn pacer(&self) -> RateLimitResult<Pacer> {
        Ok(Pacer::from_tier(&self.tier)?.with_mode(self.mode))
    }

    /// Build a paced client with a fresh pacer.
    ///
    /// # Errors
    ///
    /// Returns an error if the limits are invalid or the HTTP client cannot
    /// be built.
    pub fn client(&self, api_key: ApiKey) -> MetronomeResult<OpenAIClient> {
        let pacer = Arc::new(self.pacer()?);
        OpenAIClient::new(&self.client, api_key, pacer)
    }

    /// Burst limit actually enforced, which defaults to `rpm`.
    pub fn effective_burst(&self) -> Option<u32> {
        self.tier.burst.or(self.tier.rpm)
    }
}
