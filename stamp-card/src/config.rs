//! Stamp card rules and their environment loading

use crate::policy::DuplicatePolicy;

/// Stamp card rules
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | STAMP_THRESHOLD | 5 | Stamps needed for one coupon |
/// | COUPON_VALID_MONTHS | 1 | Coupon validity in calendar months |
/// | COUPON_PREFIX | CPN | Prefix of generated coupon codes |
/// | DUPLICATE_POLICY | global_per_day | `per_source_per_day`, `global_per_day` or `unrestricted` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampCardConfig {
    /// Stamps that complete a card (at least 1)
    pub stamp_threshold: u32,
    /// Calendar months between issue date and expiry
    pub coupon_valid_months: u32,
    /// Coupon codes are `<prefix><unix millis>`
    pub coupon_prefix: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl StampCardConfig {
    pub const DEFAULT_THRESHOLD: u32 = 5;
    pub const DEFAULT_VALID_MONTHS: u32 = 1;
    pub const DEFAULT_PREFIX: &'static str = "CPN";

    pub fn new() -> Self {
        Self {
            stamp_threshold: Self::DEFAULT_THRESHOLD,
            coupon_valid_months: Self::DEFAULT_VALID_MONTHS,
            coupon_prefix: Self::DEFAULT_PREFIX.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Load from environment variables
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::new();

        let duplicate_policy = match lookup("DUPLICATE_POLICY") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{}, falling back to {}", e, defaults.duplicate_policy);
                defaults.duplicate_policy
            }),
            None => defaults.duplicate_policy,
        };

        Self {
            stamp_threshold: lookup("STAMP_THRESHOLD")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.stamp_threshold),
            coupon_valid_months: lookup("COUPON_VALID_MONTHS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.coupon_valid_months),
            coupon_prefix: lookup("COUPON_PREFIX").unwrap_or(defaults.coupon_prefix),
            duplicate_policy,
        }
        .normalized()
    }

    /// Set the stamps needed per coupon (clamped to at least 1)
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.stamp_threshold = threshold.max(1);
        self
    }

    pub fn with_coupon_valid_months(mut self, months: u32) -> Self {
        self.coupon_valid_months = months;
        self
    }

    pub fn with_coupon_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.coupon_prefix = prefix.into();
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    fn normalized(mut self) -> Self {
        self.stamp_threshold = self.stamp_threshold.max(1);
        self
    }
}

impl Default for StampCardConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StampCardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, StampCardConfig::default());
        assert_eq!(config.stamp_threshold, 5);
        assert_eq!(config.coupon_valid_months, 1);
        assert_eq!(config.coupon_prefix, "CPN");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::GlobalPerDay);
    }

    #[test]
    fn test_overrides() {
        let config = StampCardConfig::from_lookup(lookup(&[
            ("STAMP_THRESHOLD", "10"),
            ("COUPON_VALID_MONTHS", "3"),
            ("COUPON_PREFIX", "CAFE"),
            ("DUPLICATE_POLICY", "per_source_per_day"),
        ]));

        assert_eq!(config.stamp_threshold, 10);
        assert_eq!(config.coupon_valid_months, 3);
        assert_eq!(config.coupon_prefix, "CAFE");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::PerSourcePerDay);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = StampCardConfig::from_lookup(lookup(&[
            ("STAMP_THRESHOLD", "many"),
            ("DUPLICATE_POLICY", "sometimes"),
        ]));
        assert_eq!(config.stamp_threshold, 5);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::GlobalPerDay);

        let config = StampCardConfig::from_lookup(lookup(&[("STAMP_THRESHOLD", "0")]));
        assert_eq!(config.stamp_threshold, 1);
    }

    #[test]
    fn test_builders() {
        let config = StampCardConfig::new()
            .with_threshold(0)
            .with_coupon_valid_months(2)
            .with_coupon_prefix("X")
            .with_duplicate_policy(DuplicatePolicy::Unrestricted);

        assert_eq!(config.stamp_threshold, 1);
        assert_eq!(config.coupon_valid_months, 2);
        assert_eq!(config.coupon_prefix, "X");
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Unrestricted);
    }
}
