//! Stamp request outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coupon;

/// Why a stamp request was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// This exact stamp source was already stamped today
    AlreadyStampedToday,
    /// Some stamp (any source) was already accepted today
    DailyLimitReached,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::AlreadyStampedToday => f.write_str("already stamped today"),
            Rejection::DailyLimitReached => f.write_str("daily limit reached"),
        }
    }
}

/// Result of [`crate::StampCardService::request_stamp`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StampOutcome {
    /// No stamp source was supplied
    NoRequest,
    /// Stamp recorded
    ///
    /// `count` is the card count right after the increment, so the stamp that
    /// completes a card reports the threshold even though the stored count
    /// has been reset to 0. `coupon` is set when that happened.
    Accepted { count: u32, coupon: Option<Coupon> },
    /// Turned down by the duplicate policy; nothing was written
    Rejected(Rejection),
}

impl StampOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, StampOutcome::Accepted { .. })
    }

    /// Post-increment count of an accepted stamp
    pub fn count(&self) -> Option<u32> {
        match self {
            StampOutcome::Accepted { count, .. } => Some(*count),
            _ => None,
        }
    }

    /// Coupon issued by this stamp, if any
    pub fn coupon(&self) -> Option<&Coupon> {
        match self {
            StampOutcome::Accepted { coupon, .. } => coupon.as_ref(),
            _ => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            StampOutcome::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }
}
