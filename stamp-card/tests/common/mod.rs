#![allow(dead_code)]

use chrono::NaiveDate;
use stamp_card::{
    KeyValueStore, ManualClock, MemoryStore, ProfileContext, RecordingInteraction,
    SequentialIdGenerator, StampCardConfig, StampCardService, StorageError, StorageResult,
    WriteBatch,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Service plus handles on every injected port
pub struct Harness<S = Arc<MemoryStore>> {
    pub service: StampCardService<S>,
    pub store: S,
    pub clock: Arc<ManualClock>,
    pub ui: Arc<RecordingInteraction>,
}

impl<S: KeyValueStore> Harness<S> {
    /// Stamp on behalf of `source`, then move the clock to the next day
    pub fn stamp_and_sleep(&self, source: &str) -> stamp_card::StampOutcome {
        let outcome = self.service.request_stamp(Some(source)).unwrap();
        self.clock.advance_days(1);
        outcome
    }
}

pub fn harness() -> Harness {
    harness_with(StampCardConfig::default(), ProfileContext::default_profile())
}

pub fn harness_with(config: StampCardConfig, profile: ProfileContext) -> Harness {
    let store = Arc::new(MemoryStore::new());
    harness_on(Arc::clone(&store), store, config, profile)
}

/// Harness over any cloneable store handle
pub fn harness_on<S: KeyValueStore>(
    service_store: S,
    store: S,
    config: StampCardConfig,
    profile: ProfileContext,
) -> Harness<S> {
    let clock = Arc::new(ManualClock::on(date(2024, 6, 1)));
    let ui = Arc::new(RecordingInteraction::new());
    let service = StampCardService::new(service_store, Arc::clone(&ui))
        .with_clock(Arc::clone(&clock))
        .with_id_generator(SequentialIdGenerator::new())
        .with_config(config)
        .with_profile(profile);

    Harness {
        service,
        store,
        clock,
        ui,
    }
}

/// Memory store whose reads or writes can be switched off
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk unplugged".to_string()));
        }
        self.inner.get(key)
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.apply(batch)
    }
}
