use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{BalanceStore, HistoryRecorder};
use crate::domain::{Balance, HistoryEntry, Points, UserId};

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonState {
    balances: HashMap<UserId, Balance>,
    history: HashMap<UserId, Vec<HistoryEntry>>,
}

/// Single-file JSON store implementing both collaborator interfaces.
///
/// The whole state is loaded on open and rewritten after every accepted
/// mutation. A missing file opens as an empty ledger.
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<JsonState>,
}

impl JsonStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file {}", path.display()))?
        } else {
            JsonState::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn persist(&self, state: &JsonState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Failed to serialize store")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store file {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl BalanceStore for JsonStore {
    async fn lookup(&self, user_id: UserId) -> Result<Option<Balance>> {
        let state = self.state.lock().unwrap();
        Ok(state.balances.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: UserId, points: Points) -> Result<Balance> {
        let balance = Balance::new(user_id, points, Utc::now());
        let mut state = self.state.lock().unwrap();
        state.balances.insert(user_id, balance.clone());
        self.persist(&state)?;
        Ok(balance)
    }
}

#[async_trait]
impl HistoryRecorder for JsonStore {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.history.entry(entry.user_id).or_default().push(entry);
        self.persist(&state)?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<HistoryEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.history.get(&user_id).cloned().unwrap_or_default())
    }
}
