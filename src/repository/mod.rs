//! Persistence traits.
//!
//! The core treats storage abstractly: pages are a flat collection keyed
//! by URL, the sync queue is a capped FIFO. Injected implementations keep
//! the orchestrator and queue testable without a storage dependency; the
//! `sqlite` module provides the production implementations.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{PageRecord, QueuedOperation, SyncOperation};

pub mod sqlite;

#[async_trait]
pub trait PageRepository: Send + Sync {
    async fn load_all(&self) -> Result<Vec<PageRecord>>;
    async fn get(&self, url: &str) -> Result<Option<PageRecord>>;
    async fn upsert(&self, record: &PageRecord) -> Result<()>;
    /// Returns false when no record existed for the URL.
    async fn delete(&self, url: &str) -> Result<bool>;
}

#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Append to the tail. When the queue would exceed its cap, the oldest
    /// entries are evicted first.
    async fn enqueue(&self, op: &SyncOperation) -> Result<()>;
    /// The oldest `limit` operations, in FIFO order.
    async fn front(&self, limit: usize) -> Result<Vec<QueuedOperation>>;
    async fn remove(&self, id: i64) -> Result<()>;
    /// Increment and return the operation's attempt counter.
    async fn bump_attempts(&self, id: i64) -> Result<u32>;
    async fn len(&self) -> Result<usize>;
}
