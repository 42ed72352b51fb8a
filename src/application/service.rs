use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::domain::{Balance, HistoryEntry, LedgerError, OperationKind, Points, UserId};
use crate::storage::{BalanceStore, HistoryRecorder, MemoryBalanceStore, MemoryHistoryRecorder};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// Mutations on the same user id are serialized behind a per-user async
/// mutex, so the load-validate-persist-append sequence is never interleaved
/// for one user. Operations on distinct users run in parallel; reads take
/// no lock.
pub struct LedgerService {
    balances: Arc<dyn BalanceStore>,
    history: Arc<dyn HistoryRecorder>,
    user_locks: Mutex<HashMap<UserId, Arc<tokio::sync::Mutex<()>>>>,
}

impl LedgerService {
    /// Create a new ledger service over the given collaborators.
    pub fn new(balances: Arc<dyn BalanceStore>, history: Arc<dyn HistoryRecorder>) -> Self {
        Self {
            balances,
            history,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Service backed by fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBalanceStore::new()),
            Arc::new(MemoryHistoryRecorder::new()),
        )
    }

    /// Reject non-positive user ids before they reach a store.
    pub fn validate_user(&self, user_id: UserId) -> Result<(), LedgerError> {
        if user_id <= 0 {
            return Err(LedgerError::InvalidUserId { user_id });
        }
        Ok(())
    }

    /// Current balance for a user; a user with no record reads as zero.
    pub async fn get_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        self.validate_user(user_id)?;
        self.load_balance(user_id).await
    }

    /// Charge points onto a user's balance and record the mutation.
    pub async fn charge_for_user(
        &self,
        user_id: UserId,
        amount: Points,
    ) -> Result<Balance, LedgerError> {
        self.validate_user(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let current = self.load_balance(user_id).await?;
        let new_points = current.charge(amount)?;
        let updated = self.balances.upsert(user_id, new_points).await?;
        self.history
            .append(HistoryEntry::new(
                user_id,
                amount,
                OperationKind::Charge,
                Utc::now(),
            ))
            .await?;
        Ok(updated)
    }

    /// Use points from a user's balance and record the mutation.
    pub async fn use_for_user(
        &self,
        user_id: UserId,
        amount: Points,
    ) -> Result<Balance, LedgerError> {
        self.validate_user(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let current = self.load_balance(user_id).await?;
        let new_points = current.use_points(amount)?;
        let updated = self.balances.upsert(user_id, new_points).await?;
        self.history
            .append(HistoryEntry::new(
                user_id,
                amount,
                OperationKind::Use,
                Utc::now(),
            ))
            .await?;
        Ok(updated)
    }

    /// All accepted mutations for a user, oldest first.
    pub async fn get_history(&self, user_id: UserId) -> Result<Vec<HistoryEntry>, LedgerError> {
        self.validate_user(user_id)?;
        Ok(self.history.list_by_user(user_id).await?)
    }

    async fn load_balance(&self, user_id: UserId) -> Result<Balance, LedgerError> {
        let stored = self.balances.lookup(user_id).await?;
        Ok(stored.unwrap_or_else(|| Balance::empty(user_id)))
    }

    fn user_lock(&self, user_id: UserId) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.user_locks.lock().unwrap();
        locks.entry(user_id).or_default().clone()
    }
}
