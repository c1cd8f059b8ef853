//! Profile context
//!
//! Which profile a service works on is an explicit value rather than
//! ambient global storage. The default profile uses the bare key names; a
//! named profile prefixes them, so several cards can share one store.
//!
//! | Key | Value |
//! |-----|-------|
//! | `userId` | UUID string |
//! | `stampCount` | decimal integer |
//! | `lastStampDate` | `YYYY-MM-DD` or empty |
//! | `coupons` | JSON array of coupons |
//! | `stamped` | JSON array of stamp records |

use std::fmt;

/// Logical keys of one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKey {
    UserId,
    StampCount,
    LastStampDate,
    Coupons,
    Stamped,
}

impl ProfileKey {
    /// Keys cleared by a reset; `UserId` survives
    pub const RESETTABLE: [ProfileKey; 4] = [
        ProfileKey::StampCount,
        ProfileKey::LastStampDate,
        ProfileKey::Stamped,
        ProfileKey::Coupons,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            ProfileKey::UserId => "userId",
            ProfileKey::StampCount => "stampCount",
            ProfileKey::LastStampDate => "lastStampDate",
            ProfileKey::Coupons => "coupons",
            ProfileKey::Stamped => "stamped",
        }
    }
}

/// The profile a [`crate::StampCardService`] reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileContext {
    namespace: Option<String>,
}

impl ProfileContext {
    /// Single-profile-per-device layout (bare keys)
    pub fn default_profile() -> Self {
        Self::default()
    }

    /// Profile whose keys are stored as `<namespace>:<key>`
    ///
    /// An empty namespace is the default profile.
    pub fn named(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            namespace: (!namespace.is_empty()).then_some(namespace),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Storage key for `key` within this profile
    pub fn key(&self, key: ProfileKey) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, key.name()),
            None => key.name().to_string(),
        }
    }
}

impl fmt::Display for ProfileContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace.as_deref().unwrap_or("default"))
    }
}
