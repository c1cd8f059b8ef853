//! Read model handed to renderers

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::models::{Coupon, UserProfile};

/// Snapshot of everything a renderer needs to draw the card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub user_id: Option<String>,
    pub stamp_count: u32,
    pub threshold: u32,
    pub active_coupons: Vec<Coupon>,
    /// Sources to highlight, in first-stamp order
    pub stamped_sources: Vec<String>,
}

impl CardView {
    pub fn from_profile(profile: &UserProfile, today: NaiveDate, threshold: u32) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            stamp_count: profile.stamp_count,
            threshold,
            active_coupons: profile.active_coupons(today),
            stamped_sources: profile.stamped_sources(),
        }
    }

    pub fn is_stamped(&self, source: &str) -> bool {
        self.stamped_sources.iter().any(|s| s == source)
    }

    /// Stamps still needed for the next coupon
    pub fn stamps_remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.stamp_count)
    }
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stamps: {}/{}", self.stamp_count, self.threshold)?;
        if !self.stamped_sources.is_empty() {
            writeln!(f, "Stamped: {}", self.stamped_sources.join(", "))?;
        }
        if self.active_coupons.is_empty() {
            write!(f, "Coupons: none")
        } else {
            write!(f, "Coupons:")?;
            for coupon in &self.active_coupons {
                write!(f, "\n  Code: {} (expires: {})", coupon.code, coupon.expiry)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StampRecord;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_render_empty_card() {
        let view = CardView::from_profile(&UserProfile::default(), date(2024, 6, 1), 5);
        assert_eq!(view.to_string(), "Stamps: 0/5\nCoupons: none");
        assert_eq!(view.stamps_remaining(), 5);
    }

    #[test]
    fn test_render_with_stamps_and_coupons() {
        let profile = UserProfile {
            user_id: Some("u-1".into()),
            stamp_count: 2,
            stamped: vec![
                StampRecord::new("A", date(2024, 6, 1)),
                StampRecord::new("B", date(2024, 6, 2)),
            ],
            coupons: vec![Coupon::new("CPN1", date(2024, 6, 2), 1)],
            ..Default::default()
        };

        let view = CardView::from_profile(&profile, date(2024, 6, 3), 5);
        assert!(view.is_stamped("B"));
        assert!(!view.is_stamped("C"));
        assert_eq!(
            view.to_string(),
            "Stamps: 2/5\nStamped: A, B\nCoupons:\n  Code: CPN1 (expires: 2024-07-02)"
        );
    }
}
