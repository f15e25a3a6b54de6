//! Provider-specific tier implementations.

use crate::Tier;

/// OpenAI API usage tiers.
///
/// Based on [OpenAI usage tiers](https://platform.openai.com/docs/guides/rate-limits).
/// Tiers are automatically assigned based on cumulative spend and account age.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum OpenAITier {
    /// Free tier: 3 RPM, bursts of up to 5
    Free,
    /// Tier 1: $5+ paid (500 RPM)
    Tier1,
    /// Tier 2: $50+ paid (5000 RPM)
    Tier2,
    /// Tier 3: $100+ paid (10000 RPM)
    Tier3,
    /// Tier 4: $250+ paid (10000 RPM)
    Tier4,
    /// Tier 5: $1000+ paid (10000 RPM)
    Tier5,
}

impl OpenAITier {
    /// Match a published requests-per-minute limit to a tier.
    ///
    /// Tiers 3 to 5 share an RPM limit; the lowest of them is returned.
    pub fn from_rpm(rpm: u32) -> Option<Self> {
        match rpm {
            3 => Some(OpenAITier::Free),
            500 => Some(OpenAITier::Tier1),
            5000 => Some(OpenAITier::Tier2),
            10000 => Some(OpenAITier::Tier3),
            _ => None,
        }
    }
}

impl Tier for OpenAITier {
    fn rpm(&self) -> Option<u32> {
        match self {
            OpenAITier::Free => Some(3),
            OpenAITier::Tier1 => Some(500),
            OpenAITier::Tier2 => Some(5000),
            OpenAITier::Tier3 => Some(10000),
            OpenAITier::Tier4 => Some(10000),
            OpenAITier::Tier5 => Some(10000),
        }
    }

    fn burst(&self) -> Option<u32> {
        match self {
            OpenAITier::Free => Some(5),
            _ => None,
        }
    }

    fn name(&self) -> &str {
        match self {
            OpenAITier::Free => "Free",
            OpenAITier::Tier1 => "Tier 1",
            OpenAITier::Tier2 => "Tier 2",
            OpenAITier::Tier3 => "Tier 3",
            OpenAITier::Tier4 => "Tier 4",
            OpenAITier::Tier5 => "Tier 5",
        }
    }
}
