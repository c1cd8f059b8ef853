//! Profile & Stamp Record Models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Coupon;

/// One accepted stamp
///
/// Stored as `{"id":"shop-1","date":"YYYY-MM-DD"}`. Older cards kept bare
/// source ids (`"shop-1"`); those decode with `date: None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StampRecordRepr")]
pub struct StampRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StampRecordRepr {
    Dated {
        id: String,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    Bare(String),
}

impl From<StampRecordRepr> for StampRecord {
    fn from(repr: StampRecordRepr) -> Self {
        match repr {
            StampRecordRepr::Dated { id, date } => Self { id, date },
            StampRecordRepr::Bare(id) => Self { id, date: None },
        }
    }
}

impl StampRecord {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date: Some(date),
        }
    }

    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.date == Some(day)
    }
}

/// Persisted per-profile state, assembled from the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// `None` until the profile has been created
    pub user_id: Option<String>,
    pub stamp_count: u32,
    pub last_stamp_date: Option<NaiveDate>,
    pub stamped: Vec<StampRecord>,
    pub coupons: Vec<Coupon>,
}

impl UserProfile {
    /// Whether `source` has a stamp recorded for `day`
    pub fn stamped_on(&self, source: &str, day: NaiveDate) -> bool {
        self.stamped.iter().any(|s| s.id == source && s.is_on(day))
    }

    /// Whether any stamp was accepted on `day`
    pub fn stamped_any_on(&self, day: NaiveDate) -> bool {
        self.last_stamp_date == Some(day) || self.stamped.iter().any(|s| s.is_on(day))
    }

    /// Whether `source` was ever stamped (drives highlighting)
    pub fn is_stamped(&self, source: &str) -> bool {
        self.stamped.iter().any(|s| s.id == source)
    }

    /// Distinct stamped source ids in first-stamp order
    pub fn stamped_sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.stamped
            .iter()
            .filter(|s| seen.insert(s.id.as_str()))
            .map(|s| s.id.clone())
            .collect()
    }

    /// Unused, unexpired coupons in issuance order, one per code
    pub fn active_coupons(&self, today: NaiveDate) -> Vec<Coupon> {
        let mut seen = HashSet::new();
        self.coupons
            .iter()
            .filter(|c| c.is_active(today))
            .filter(|c| seen.insert(c.code.as_str()))
            .cloned()
            .collect()
    }

    pub fn has_coupon_code(&self, code: &str) -> bool {
        self.coupons.iter().any(|c| c.code == code)
    }
}
