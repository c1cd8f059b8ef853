//! Duplicate-stamp policy
//!
//! Pure decision function: given the stored profile, the requested source
//! and today's date, decide whether a stamp may be recorded.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use crate::models::{Rejection, UserProfile};

/// Which repeated stamps are refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The same source at most once per day; different sources may stack
    PerSourcePerDay,
    /// At most one stamp per calendar day overall
    #[default]
    GlobalPerDay,
    /// Every request is accepted
    Unrestricted,
}

impl DuplicatePolicy {
    /// Check a request against the stored state
    ///
    /// The per-source rule is tested before the daily limit, so a repeated
    /// source reports [`Rejection::AlreadyStampedToday`] under either
    /// restricting policy.
    pub fn check(
        &self,
        profile: &UserProfile,
        source: &str,
        today: NaiveDate,
    ) -> Result<(), Rejection> {
        match self {
            DuplicatePolicy::Unrestricted => Ok(()),
            DuplicatePolicy::PerSourcePerDay => {
                if profile.stamped_on(source, today) {
                    return Err(Rejection::AlreadyStampedToday);
                }
                Ok(())
            }
            DuplicatePolicy::GlobalPerDay => {
                if profile.stamped_on(source, today) {
                    return Err(Rejection::AlreadyStampedToday);
                }
                if profile.stamped_any_on(today) {
                    return Err(Rejection::DailyLimitReached);
                }
                Ok(())
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::PerSourcePerDay => "per_source_per_day",
            DuplicatePolicy::GlobalPerDay => "global_per_day",
            DuplicatePolicy::Unrestricted => "unrestricted",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "per_source_per_day" | "per_source" => Ok(DuplicatePolicy::PerSourcePerDay),
            "global_per_day" | "global" => Ok(DuplicatePolicy::GlobalPerDay),
            "unrestricted" | "none" => Ok(DuplicatePolicy::Unrestricted),
            other => Err(format!("Unknown duplicate policy: {}", other)),
        }
    }
}
