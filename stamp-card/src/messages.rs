//! Texts shown through [`crate::UserInteraction`]

use crate::models::Rejection;

pub(crate) const RESET_CONFIRM: &str =
    "Reset the stamp card? All stamps and coupons will be erased.";

pub(crate) const RESET_DONE: &str = "The stamp card has been reset.";

pub(crate) fn rejected(reason: Rejection) -> &'static str {
    match reason {
        Rejection::AlreadyStampedToday => "This stamp has already been collected today.",
        Rejection::DailyLimitReached => "You have already collected a stamp today.",
    }
}

pub(crate) fn stamp_accepted(count: u32) -> String {
    format!("Stamp collected! Current stamps: {}", count)
}

pub(crate) fn coupon_issued(code: &str) -> String {
    format!("Coupon issued! Code: {}", code)
}

pub(crate) fn coupon_used(code: &str) -> String {
    format!("Coupon {} marked as used.", code)
}

pub(crate) fn storage_failed(error: &dyn std::fmt::Display) -> String {
    format!("Could not update the stamp card: {}", error)
}
