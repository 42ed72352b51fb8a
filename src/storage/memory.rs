use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::{BalanceStore, HistoryRecorder};
use crate::domain::{Balance, HistoryEntry, Points, UserId};

/// In-memory balance store. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryBalanceStore {
    balances: Arc<Mutex<HashMap<UserId, Balance>>>,
}

impl MemoryBalanceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for MemoryBalanceStore {
    async fn lookup(&self, user_id: UserId) -> Result<Option<Balance>> {
        let balances = self.balances.lock().unwrap();
        Ok(balances.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: UserId, points: Points) -> Result<Balance> {
        let balance = Balance::new(user_id, points, Utc::now());
        let mut balances = self.balances.lock().unwrap();
        balances.insert(user_id, balance.clone());
        Ok(balance)
    }
}

/// In-memory history recorder. Entries keep insertion order per user.
#[derive(Clone, Default)]
pub struct MemoryHistoryRecorder {
    entries: Arc<Mutex<HashMap<UserId, Vec<HistoryEntry>>>>,
}

impl MemoryHistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryRecorder for MemoryHistoryRecorder {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        entries.entry(entry.user_id).or_default().push(entry);
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(&user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OperationKind;

    #[tokio::test]
    async fn test_lookup_missing_user() {
        let store = MemoryBalanceStore::new();
        assert!(store.lookup(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_and_replaces() {
        let store = MemoryBalanceStore::new();

        let created = store.upsert(1, 10_000).await.unwrap();
        assert_eq!(created.points, 10_000);

        let replaced = store.upsert(1, 25_000).await.unwrap();
        assert_eq!(replaced.points, 25_000);

        let stored = store.lookup(1).await.unwrap().unwrap();
        assert_eq!(stored.points, 25_000);
    }

    #[tokio::test]
    async fn test_history_keeps_append_order() {
        let recorder = MemoryHistoryRecorder::new();
        recorder
            .append(HistoryEntry::new(1, 10_000, OperationKind::Charge, Utc::now()))
            .await
            .unwrap();
        recorder
            .append(HistoryEntry::new(1, 1_000, OperationKind::Use, Utc::now()))
            .await
            .unwrap();

        let entries = recorder.list_by_user(1).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, OperationKind::Charge);
        assert_eq!(entries[1].kind, OperationKind::Use);

        assert!(recorder.list_by_user(2).await.unwrap().is_empty());
    }
}
