//! User id generation port

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Produces the identifier assigned to a new profile
pub trait IdGenerator {
    fn new_id(&self) -> Uuid;
}

impl<T: IdGenerator + ?Sized> IdGenerator for Arc<T> {
    fn new_id(&self) -> Uuid {
        (**self).new_id()
    }
}

impl<T: IdGenerator + ?Sized> IdGenerator for Box<T> {
    fn new_id(&self) -> Uuid {
        (**self).new_id()
    }
}

/// Random version-4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic ids: 00000000-0000-4000-8000-000000000001, ...
///
/// Each id keeps the v4 version nibble and RFC 4122 variant bits, so it is
/// indistinguishable in shape from a random one.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn new_id(&self) -> Uuid {
        let n = u128::from(self.next.fetch_add(1, Ordering::Relaxed) & 0xFFFF_FFFF_FFFF);
        // version 4 in bits 76..80, variant 0b10 in bits 62..64
        Uuid::from_u128(n | (0x4 << 76) | (0x8 << 60))
    }
}
