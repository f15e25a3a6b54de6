//! Tier trait for representing API rate limit constraints.

/// Pacing constraints published for an API tier.
///
/// All limits are optional: `None` means the tier does not publish one.
/// A tier with no `rpm` cannot drive a [`Pacer`](crate::Pacer).
///
/// # Example
///
/// ```
/// use metronome_rate_limit::Tier;
///
/// struct Trial;
///
/// impl Tier for Trial {
///     fn rpm(&self) -> Option<u32> { Some(3) }
///     fn burst(&self) -> Option<u32> { Some(5) }
///     fn name(&self) -> &str { "Trial" }
/// }
///
/// assert_eq!(Trial.rpm(), Some(3));
/// ```
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Maximum calls within a trailing 60-second window.
    ///
    /// Returns `None` when the tier only publishes a steady rate.
    fn burst(&self) -> Option<u32>;

    /// Name of the tier (e.g., "Free", "Tier 1").
    fn name(&self) -> &str;
}
