//! Tests for layering command-line overrides over configuration.

use metronome::{
    MetronomeConfig, MetronomeErrorKind, PacingMode, PacingOverrides, RateLimitErrorKind,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn config_from(toml: &str) -> MetronomeConfig {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    file.write_all(toml.as_bytes()).unwrap();
    MetronomeConfig::from_file(file.path()).unwrap()
}

const CONFIG: &str = r#"
[client]
model = "gpt-3.5-turbo"
min_request_interval_ms = 0

[pacing]
mode = "strict"

[providers.openai]
default_tier = "free"

[providers.openai.tiers.free]
name = "Free"
rpm = 3
burst = 5

[providers.openai.tiers.tier1]
name = "Tier 1"
rpm = 500

[providers.openai.tiers.tier1.models."gpt-4o"]
rpm = 200
burst = 20
"#;

#[test]
fn test_defaults_follow_configuration() {
    let settings = PacingOverrides::default().apply(&config_from(CONFIG)).unwrap();

    assert_eq!(settings.tier.name, "Free");
    assert_eq!(settings.tier.rpm, Some(3));
    assert_eq!(settings.effective_burst(), Some(5));
    assert_eq!(settings.mode, PacingMode::Strict);
    assert_eq!(settings.client.model, "gpt-3.5-turbo");
}

#[test]
fn test_model_override_selects_model_limits() {
    let overrides = PacingOverrides {
        tier: Some("tier1".to_string()),
        model: Some("gpt-4o".to_string()),
        ..Default::default()
    };

    let settings = overrides.apply(&config_from(CONFIG)).unwrap();

    assert_eq!(settings.client.model, "gpt-4o");
    assert_eq!(settings.tier.rpm, Some(200));
    assert_eq!(settings.tier.burst, Some(20));
}

#[test]
fn test_explicit_limits_win_over_tier_and_model() {
    let overrides = PacingOverrides {
        tier: Some("tier1".to_string()),
        model: Some("gpt-4o".to_string()),
        rpm: Some(7),
        burst: Some(2),
        mode: Some(PacingMode::Reference),
        ..Default::default()
    };

    let settings = overrides.apply(&config_from(CONFIG)).unwrap();
    let pacer = settings.pacer().unwrap();

    assert_eq!(pacer.requests_per_minute().get(), 7);
    assert_eq!(pacer.burst_limit().get(), 2);
    assert_eq!(pacer.mode(), PacingMode::Reference);
}

#[test]
fn test_tier_without_burst_paces_at_rpm() {
    let overrides = PacingOverrides {
        tier: Some("tier1".to_string()),
        ..Default::default()
    };

    let pacer = overrides.apply(&config_from(CONFIG)).unwrap().pacer().unwrap();

    assert_eq!(pacer.requests_per_minute().get(), 500);
    assert_eq!(pacer.burst_limit().get(), 500);
}

#[test]
fn test_zero_rpm_override_is_invalid() {
    let overrides = PacingOverrides {
        rpm: Some(0),
        ..Default::default()
    };

    let settings = overrides.apply(&config_from(CONFIG)).unwrap();
    let err = settings.pacer().unwrap_err();

    assert!(matches!(err.kind(), RateLimitErrorKind::InvalidTier { .. }));
}

#[test]
fn test_unknown_tier_is_reported() {
    let overrides = PacingOverrides {
        tier: Some("platinum".to_string()),
        ..Default::default()
    };

    let err = overrides.apply(&config_from(CONFIG)).unwrap_err();

    match err.kind() {
        MetronomeErrorKind::RateLimit(e) => assert_eq!(
            e.kind(),
            &RateLimitErrorKind::UnknownTier {
                provider: "openai".to_string(),
                tier: "platinum".to_string(),
            }
        ),
        other => panic!("expected a rate-limit error, got {other:?}"),
    }
}
