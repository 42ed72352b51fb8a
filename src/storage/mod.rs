use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{Balance, HistoryEntry, Points, UserId};

mod json;
mod memory;

pub use json::*;
pub use memory::*;

/// Current-value store for per-user balances.
///
/// `upsert` replaces the record wholesale, stamping the current time, and
/// creates it when absent. Errors here are infrastructure failures, never
/// business-rule rejections.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn lookup(&self, user_id: UserId) -> Result<Option<Balance>>;
    async fn upsert(&self, user_id: UserId, points: Points) -> Result<Balance>;
}

/// Append-only recorder for accepted mutations, ordered per user by
/// insertion.
#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    async fn append(&self, entry: HistoryEntry) -> Result<()>;
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>>;
}
