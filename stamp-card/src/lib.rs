//! # stamp-card
//!
//! Loyalty stamp card state machine.
//!
//! A visitor collects at most one stamp per day (see [`DuplicatePolicy`]),
//! and every `stamp_threshold` stamps turn into a coupon valid for a fixed
//! number of calendar months. All state lives in a [`KeyValueStore`] bound to
//! one [`ProfileContext`].
//!
//! ## Scope
//!
//! This crate handles WHAT happens to a stamp card:
//! - stamp acceptance and duplicate rejection
//! - coupon issuance, redemption and expiry filtering
//! - confirmed reset
//!
//! Everything environmental is injected through ports:
//! - storage → [`KeyValueStore`] ([`MemoryStore`], [`RedbStore`])
//! - dialogs → [`UserInteraction`]
//! - "today" → [`Clock`]
//! - user ids → [`IdGenerator`]
//!
//! ## Example
//!
//! ```ignore
//! use stamp_card::{MemoryStore, RecordingInteraction, StampCardService};
//!
//! let service = StampCardService::new(MemoryStore::new(), RecordingInteraction::new());
//! let view = service.on_load(Some("?stampId=shop-1"))?;
//! println!("{view}");
//! ```

/// Business audit event (coupon issued/used, reset)
///
/// Emitted on the `audit` target so hosts can route it to a separate sink.
macro_rules! audit_log {
    ($user_id:expr, $action:expr, $resource:expr) => {
        tracing::info!(
            target: "audit",
            user_id = $user_id,
            action = $action,
            resource = $resource,
            "AUDIT"
        )
    };
}
pub(crate) use audit_log;

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod interaction;
pub mod models;
pub mod policy;
pub mod service;
pub mod session;
pub mod storage;
pub mod view;

mod messages;
mod util;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StampCardConfig;
pub use error::{StampError, StampResult};
pub use id::{IdGenerator, SequentialIdGenerator, UuidV4Generator};
pub use interaction::{RecordingInteraction, UserInteraction};
pub use models::{Coupon, Rejection, StampOutcome, StampRecord, UserProfile};
pub use policy::DuplicatePolicy;
pub use service::StampCardService;
pub use session::{ProfileContext, ProfileKey};
pub use storage::{
    KeyValueStore, MemoryStore, RedbStore, StorageError, StorageResult, WriteBatch, WriteOp,
};
pub use util::{add_months, stamp_source_from_query};
pub use view::CardView;
