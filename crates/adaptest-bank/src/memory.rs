//! In-memory stores for tests and embedding.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use adaptest_core::model::Item;
use adaptest_core::traits::ItemBankStore;
use adaptest_core::ItemBank;

use crate::error::BankError;

/// A store serving a fixed list of items.
///
/// Counts snapshot calls so tests can assert that the engine takes exactly
/// one snapshot per request.
pub struct MemoryStore {
    items: Vec<Item>,
    snapshot_count: AtomicU32,
}

impl MemoryStore {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            snapshot_count: AtomicU32::new(0),
        }
    }

    /// Number of snapshots taken so far.
    pub fn snapshot_count(&self) -> u32 {
        self.snapshot_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ItemBankStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn snapshot(&self) -> anyhow::Result<ItemBank> {
        self.snapshot_count.fetch_add(1, Ordering::Relaxed);
        Ok(ItemBank::new(self.items.clone()))
    }
}

/// A store that always fails, for exercising the error path.
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ItemBankStore for UnavailableStore {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn snapshot(&self) -> anyhow::Result<ItemBank> {
        Err(BankError::Unavailable(self.reason.clone()).into())
    }
}
