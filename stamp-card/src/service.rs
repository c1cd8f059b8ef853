//! Stamp card service
//!
//! Every operation is one read of the profile followed by at most one
//! [`WriteBatch`]. Policy rejections are returned as outcomes; storage and
//! encoding failures abort the operation, are shown to the user and come
//! back as [`crate::StampError`].
//!
//! # Flow
//!
//! ```text
//! on_load(query)
//!   ├── ensure_profile()          create userId + empty card once
//!   ├── request_stamp(stampId)    policy check → count + 1 → coupon at threshold
//!   └── view()                    CardView for the renderer
//! ```

use serde::de::DeserializeOwned;

use crate::clock::{Clock, SystemClock};
use crate::config::StampCardConfig;
use crate::error::StampResult;
use crate::id::{IdGenerator, UuidV4Generator};
use crate::interaction::UserInteraction;
use crate::messages;
use crate::models::{Coupon, StampOutcome, StampRecord, UserProfile};
use crate::session::{ProfileContext, ProfileKey};
use crate::storage::{KeyValueStore, WriteBatch};
use crate::util::{format_date, parse_stored_date, stamp_source_from_query};
use crate::view::CardView;

/// Stamp/coupon state machine over an injected store
pub struct StampCardService<S> {
    store: S,
    profile: ProfileContext,
    config: StampCardConfig,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    ui: Box<dyn UserInteraction>,
}

impl<S: KeyValueStore> StampCardService<S> {
    /// Service on the default profile with the wall clock and random ids
    pub fn new(store: S, ui: impl UserInteraction + 'static) -> Self {
        Self {
            store,
            profile: ProfileContext::default_profile(),
            config: StampCardConfig::default(),
            clock: Box::new(SystemClock),
            ids: Box::new(UuidV4Generator),
            ui: Box::new(ui),
        }
    }

    pub fn with_profile(mut self, profile: ProfileContext) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_config(mut self, config: StampCardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StampCardConfig {
        &self.config
    }

    pub fn profile_context(&self) -> &ProfileContext {
        &self.profile
    }

    // ========== Commands ==========

    /// Create the profile if it does not exist yet
    ///
    /// Returns the profile's user id. An existing profile is left untouched.
    pub fn ensure_profile(&self) -> StampResult<String> {
        self.report("ensure_profile", self.ensure_profile_inner())
    }

    /// Try to record a stamp for `source`
    ///
    /// `None` or an empty id is not a request. A stamp that completes the
    /// card issues a coupon and resets the count in the same write.
    pub fn request_stamp(&self, source: Option<&str>) -> StampResult<StampOutcome> {
        self.report("request_stamp", self.request_stamp_inner(source))
    }

    /// Append a new coupon to the profile
    pub fn issue_coupon(&self) -> StampResult<Coupon> {
        let result = self.load().and_then(|mut profile| {
            let coupon = self.new_coupon(&profile);
            profile.coupons.push(coupon.clone());

            let mut batch = WriteBatch::new();
            batch.set(self.key(ProfileKey::Coupons), serde_json::to_string(&profile.coupons)?);
            self.store.apply(batch)?;

            self.announce_coupon(&profile, &coupon);
            Ok(coupon)
        });
        self.report("issue_coupon", result)
    }

    /// Redeem the first active coupon carrying `code`
    ///
    /// Returns the redeemed coupon, or `None` (nothing written) when no
    /// unused, unexpired coupon has that code.
    pub fn mark_coupon_used(&self, code: &str) -> StampResult<Option<Coupon>> {
        let result = self.load().and_then(|mut profile| {
            let today = self.clock.today();
            let Some(index) = profile
                .coupons
                .iter()
                .position(|c| c.code == code && c.is_active(today))
            else {
                tracing::debug!(profile = %self.profile, code, "No active coupon with this code");
                return Ok(None);
            };

            profile.coupons[index].used = true;
            let mut batch = WriteBatch::new();
            batch.set(self.key(ProfileKey::Coupons), serde_json::to_string(&profile.coupons)?);
            self.store.apply(batch)?;

            let coupon = profile.coupons[index].clone();
            tracing::info!(profile = %self.profile, code = %coupon.code, "Coupon used");
            crate::audit_log!(user_label(&profile), "coupon_used", coupon.code.as_str());
            self.ui.notify(&messages::coupon_used(&coupon.code));
            Ok(Some(coupon))
        });
        self.report("mark_coupon_used", result)
    }

    /// Clear stamps, dates and coupons after the user confirms
    ///
    /// Returns `false` when the user declined. The user id is kept.
    pub fn reset(&self) -> StampResult<bool> {
        if !self.ui.confirm(messages::RESET_CONFIRM) {
            tracing::info!(profile = %self.profile, "Reset cancelled");
            return Ok(false);
        }

        let result = self.user_id_inner().and_then(|user_id| {
            let mut batch = WriteBatch::new();
            for key in ProfileKey::RESETTABLE {
                batch.remove(self.key(key));
            }
            self.store.apply(batch)?;

            tracing::info!(profile = %self.profile, "Stamp card reset");
            let resource = format!("profile:{}", self.profile);
            crate::audit_log!(
                user_id.as_deref().unwrap_or("unknown"),
                "reset",
                resource.as_str()
            );
            self.ui.notify(messages::RESET_DONE);
            Ok(true)
        });
        self.report("reset", result)
    }

    /// Page-load flow: ensure the profile, apply `stampId` from the query
    /// string if present, and return the card for rendering
    pub fn on_load(&self, query: Option<&str>) -> StampResult<CardView> {
        let result = self.ensure_profile_inner().and_then(|_| {
            let source = query.and_then(stamp_source_from_query);
            self.request_stamp_inner(source.as_deref())?;
            self.view_inner()
        });
        self.report("on_load", result)
    }

    // ========== Queries ==========

    /// Current stamp count
    pub fn get_count(&self) -> StampResult<u32> {
        self.report("get_count", self.load().map(|p| p.stamp_count))
    }

    /// Unused, unexpired coupons in issuance order, one per code
    pub fn list_active_coupons(&self) -> StampResult<Vec<Coupon>> {
        let today = self.clock.today();
        self.report(
            "list_active_coupons",
            self.load().map(|p| p.active_coupons(today)),
        )
    }

    /// Whether `source` has ever been stamped
    pub fn is_stamped(&self, source: &str) -> StampResult<bool> {
        self.report("is_stamped", self.load().map(|p| p.is_stamped(source)))
    }

    pub fn stamped_sources(&self) -> StampResult<Vec<String>> {
        self.report("stamped_sources", self.load().map(|p| p.stamped_sources()))
    }

    pub fn user_id(&self) -> StampResult<Option<String>> {
        self.report("user_id", self.user_id_inner())
    }

    /// Full stored state of the profile
    pub fn profile(&self) -> StampResult<UserProfile> {
        self.report("profile", self.load())
    }

    pub fn view(&self) -> StampResult<CardView> {
        self.report("view", self.view_inner())
    }

    // ========== Internals ==========

    fn ensure_profile_inner(&self) -> StampResult<String> {
        if let Some(user_id) = self.user_id_inner()? {
            return Ok(user_id);
        }

        let user_id = self.ids.new_id().to_string();
        let mut batch = WriteBatch::new();
        batch
            .set(self.key(ProfileKey::UserId), user_id.as_str())
            .set(self.key(ProfileKey::StampCount), "0")
            .set(self.key(ProfileKey::LastStampDate), "")
            .set(self.key(ProfileKey::Coupons), "[]")
            .set(self.key(ProfileKey::Stamped), "[]");
        self.store.apply(batch)?;

        tracing::info!(profile = %self.profile, user_id = %user_id, "Profile created");
        Ok(user_id)
    }

    fn request_stamp_inner(&self, source: Option<&str>) -> StampResult<StampOutcome> {
        let Some(source) = source.filter(|s| !s.is_empty()) else {
            return Ok(StampOutcome::NoRequest);
        };

        let today = self.clock.today();
        let mut profile = self.load()?;

        if let Err(reason) = self.config.duplicate_policy.check(&profile, source, today) {
            tracing::warn!(
                profile = %self.profile,
                source,
                policy = %self.config.duplicate_policy,
                reason = %reason,
                "Stamp rejected"
            );
            self.ui.notify(messages::rejected(reason));
            return Ok(StampOutcome::Rejected(reason));
        }

        profile.stamped.push(StampRecord::new(source, today));
        let count = profile.stamp_count.saturating_add(1);

        let mut batch = WriteBatch::new();
        let coupon = if count >= self.config.stamp_threshold {
            let coupon = self.new_coupon(&profile);
            profile.coupons.push(coupon.clone());
            profile.stamp_count = 0;
            batch.set(self.key(ProfileKey::Coupons), serde_json::to_string(&profile.coupons)?);
            Some(coupon)
        } else {
            profile.stamp_count = count;
            None
        };
        batch
            .set(self.key(ProfileKey::Stamped), serde_json::to_string(&profile.stamped)?)
            .set(self.key(ProfileKey::StampCount), profile.stamp_count.to_string())
            .set(self.key(ProfileKey::LastStampDate), format_date(today));
        self.store.apply(batch)?;

        tracing::info!(profile = %self.profile, source, count, "Stamp accepted");
        self.ui.notify(&messages::stamp_accepted(count));
        if let Some(coupon) = &coupon {
            self.announce_coupon(&profile, coupon);
        }

        Ok(StampOutcome::Accepted { count, coupon })
    }

    fn view_inner(&self) -> StampResult<CardView> {
        let profile = self.load()?;
        Ok(CardView::from_profile(
            &profile,
            self.clock.today(),
            self.config.stamp_threshold,
        ))
    }

    fn user_id_inner(&self) -> StampResult<Option<String>> {
        Ok(self
            .store
            .get(&self.key(ProfileKey::UserId))?
            .filter(|id| !id.is_empty()))
    }

    /// Build (but do not store) the next coupon
    ///
    /// The code is `<prefix><unix millis>`, bumped until unique in the
    /// profile.
    fn new_coupon(&self, profile: &UserProfile) -> Coupon {
        let prefix = &self.config.coupon_prefix;
        let mut millis = self.clock.now().timestamp_millis();
        let mut code = format!("{}{}", prefix, millis);
        while profile.has_coupon_code(&code) {
            millis += 1;
            code = format!("{}{}", prefix, millis);
        }
        Coupon::new(code, self.clock.today(), self.config.coupon_valid_months)
    }

    fn announce_coupon(&self, profile: &UserProfile, coupon: &Coupon) {
        tracing::info!(
            profile = %self.profile,
            code = %coupon.code,
            expiry = %coupon.expiry,
            "Coupon issued"
        );
        crate::audit_log!(user_label(profile), "coupon_issued", coupon.code.as_str());
        self.ui.notify(&messages::coupon_issued(&coupon.code));
    }

    /// Assemble the profile from its keys, tolerating malformed values
    fn load(&self) -> StampResult<UserProfile> {
        let user_id = self.user_id_inner()?;
        let stamp_count = match self.read(ProfileKey::StampCount)? {
            Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(profile = %self.profile, value = %raw, "Malformed stamp count, using 0");
                0
            }),
            _ => 0,
        };
        let last_stamp_date = self
            .read(ProfileKey::LastStampDate)?
            .and_then(|raw| parse_stored_date(&raw));

        Ok(UserProfile {
            user_id,
            stamp_count,
            last_stamp_date,
            stamped: self.read_list(ProfileKey::Stamped)?,
            coupons: self.read_list(ProfileKey::Coupons)?,
        })
    }

    fn read(&self, key: ProfileKey) -> StampResult<Option<String>> {
        Ok(self.store.get(&self.key(key))?)
    }

    /// JSON list under `key`, decoded entry by entry
    ///
    /// Absent or unparsable lists read as empty. Entries that fail to decode
    /// are skipped so the rest of the list survives the next write.
    fn read_list<T: DeserializeOwned>(&self, key: ProfileKey) -> StampResult<Vec<T>> {
        let Some(raw) = self.read(key)? else {
            return Ok(Vec::new());
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    profile = %self.profile,
                    key = key.name(),
                    error = %e,
                    "Malformed stored list, treating as empty"
                );
                return Ok(Vec::new());
            }
        };

        Ok(entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(
                        profile = %self.profile,
                        key = key.name(),
                        index,
                        error = %e,
                        "Skipping malformed stored entry"
                    );
                    None
                }
            })
            .collect())
    }

    fn key(&self, key: ProfileKey) -> String {
        self.profile.key(key)
    }

    /// Show a failed operation to the user before handing the error back
    fn report<T>(&self, operation: &str, result: StampResult<T>) -> StampResult<T> {
        if let Err(e) = &result {
            tracing::error!(profile = %self.profile, operation, error = %e, "Stamp card operation failed");
            self.ui.notify(&messages::storage_failed(e));
        }
        result
    }
}

fn user_label(profile: &UserProfile) -> &str {
    profile.user_id.as_deref().unwrap_or("unknown")
}
