//! Core trait definitions.
//!
//! The item bank store is external to the engine; implementations live in
//! the `adaptest-bank` crate.

use async_trait::async_trait;

use crate::bank::ItemBank;

/// A read-only source of item bank snapshots.
///
/// The engine takes exactly one snapshot per request and never writes back.
/// How a store obtains or refreshes its data is its own business.
#[async_trait]
pub trait ItemBankStore: Send + Sync {
    /// Human-readable store name (e.g. "file").
    fn name(&self) -> &str;

    /// Produce a snapshot of the bank for one request.
    async fn snapshot(&self) -> anyhow::Result<ItemBank>;
}
