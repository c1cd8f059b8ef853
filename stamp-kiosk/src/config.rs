use anyhow::Context;
use chrono::NaiveDate;
use stamp_card::{ProfileContext, StampCardConfig};
use std::path::PathBuf;

/// Database file inside the work directory
const DB_FILE: &str = "stamp-card.redb";

/// Kiosk configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./stamp-data | Holds the redb database |
/// | PROFILE | (none) | Profile namespace, keys become `<PROFILE>:<key>` |
/// | LOG_LEVEL | info | Used when `RUST_LOG` is unset |
/// | LOG_JSON | false | JSON console logs |
/// | LOG_DIR | (none) | Enables daily app and audit log files |
/// | STAMP_TODAY | (none) | `YYYY-MM-DD`, pins the clock to that day |
///
/// The card rules (`STAMP_THRESHOLD`, `COUPON_VALID_MONTHS`, ...) are read by
/// [`StampCardConfig::from_lookup`].
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/tmp/card STAMP_TODAY=2024-06-01 stamp-kiosk visit "?stampId=shop-1"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub profile: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<PathBuf>,
    /// Pinned "today" for demos and replaying a day
    pub today: Option<NaiveDate>,
    pub card: StampCardConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source
    ///
    /// Only a malformed `STAMP_TODAY` is an error; everything else falls back
    /// to its default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let today = non_empty("STAMP_TODAY")
            .map(|raw| {
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .with_context(|| format!("STAMP_TODAY must be YYYY-MM-DD, got {:?}", raw))
            })
            .transpose()?;

        Ok(Self {
            work_dir: non_empty("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./stamp-data")),
            profile: non_empty("PROFILE"),
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: non_empty("LOG_JSON")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(false),
            log_dir: non_empty("LOG_DIR").map(PathBuf::from),
            today,
            card: StampCardConfig::from_lookup(&lookup),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.work_dir.join(DB_FILE)
    }

    pub fn profile_context(&self) -> ProfileContext {
        match &self.profile {
            Some(name) => ProfileContext::named(name.as_str()),
            None => ProfileContext::default_profile(),
        }
    }
}
