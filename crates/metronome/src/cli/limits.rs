//! Effective limits command handler.

use metronome::{ConfigError, EffectiveSettings, MetronomeResult};

/// Human-readable summary of the effective settings.
fn summary(settings: &EffectiveSettings) -> String {
    let fmt_limit = |limit: Option<u32>| limit.map_or_else(|| "unset".to_string(), |v| v.to_string());

    format!(
        "Provider:     {}\n\
         Tier:         {}\n\
         RPM:          {}\n\
         Burst:        {}\n\
         Mode:         {}\n\
         Model:        {}\n\
         Min interval: {} ms",
        settings.provider,
        settings.tier.name,
        fmt_limit(settings.tier.rpm),
        fmt_limit(settings.effective_burst()),
        settings.mode,
        settings.client.model,
        settings.client.min_request_interval_ms,
    )
}

/// Print the effective tier, mode and client settings, then the tier as TOML.
pub fn show_limits(settings: &EffectiveSettings) -> MetronomeResult<()> {
    println!("{}", summary(settings));

    let tier_toml = toml::to_string_pretty(&settings.tier)
        .map_err(|e| ConfigError::new(format!("Failed to render tier: {}", e)))?;
    println!("\n[providers.{}.tiers.effective]\n{}", settings.provider, tier_toml);
    Ok(())
}
