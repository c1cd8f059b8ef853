//! Coupon Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::util::add_months;

/// Reward issued when the stamp threshold is reached
///
/// Serialized as `{"code":"CPN…","issued":"YYYY-MM-DD","used":false,"expiry":"YYYY-MM-DD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub issued: NaiveDate,
    /// One-way flag: false → true on redemption
    #[serde(default)]
    pub used: bool,
    pub expiry: NaiveDate,
}

impl Coupon {
    /// Fresh, unused coupon valid for `valid_months` calendar months
    pub fn new(code: impl Into<String>, issued: NaiveDate, valid_months: u32) -> Self {
        Self {
            code: code.into(),
            issued,
            used: false,
            expiry: add_months(issued, valid_months),
        }
    }

    /// Expired once the expiry date lies strictly before `today`
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry < today
    }

    /// Neither used nor expired
    pub fn is_active(&self, today: NaiveDate) -> bool {
        !self.used && !self.is_expired(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expiry_clamps_to_month_end() {
        let coupon = Coupon::new("CPN1", date(2024, 1, 31), 1);
        assert_eq!(coupon.expiry, date(2024, 2, 29));

        let coupon = Coupon::new("CPN2", date(2023, 1, 31), 1);
        assert_eq!(coupon.expiry, date(2023, 2, 28));
    }

    #[test]
    fn test_active_until_expiry_day_inclusive() {
        let coupon = Coupon::new("CPN1", date(2024, 3, 15), 1);

        assert!(coupon.is_active(date(2024, 4, 15)));
        assert!(!coupon.is_active(date(2024, 4, 16)));
        assert!(coupon.is_expired(date(2024, 4, 16)));
    }

    #[test]
    fn test_used_coupon_is_inactive() {
        let mut coupon = Coupon::new("CPN1", date(2024, 3, 15), 1);
        coupon.used = true;
        assert!(!coupon.is_active(date(2024, 3, 15)));
    }

    #[test]
    fn test_json_shape_matches_stored_format() {
        let coupon = Coupon::new("CPN1706659200000", date(2024, 1, 31), 1);
        let json = serde_json::to_string(&coupon).unwrap();
        assert_eq!(
            json,
            r#"{"code":"CPN1706659200000","issued":"2024-01-31","used":false,"expiry":"2024-02-29"}"#
        );
    }

    #[test]
    fn test_missing_used_flag_defaults_to_false() {
        let coupon: Coupon =
            serde_json::from_str(r#"{"code":"CPN1","issued":"2024-01-01","expiry":"2024-02-01"}"#)
                .unwrap();
        assert!(!coupon.used);
    }
}
