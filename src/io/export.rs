use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::LedgerService;
use crate::domain::{Balance, HistoryEntry, UserId};

/// Snapshot of one user's ledger state for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub balance: Balance,
    pub history: Vec<HistoryEntry>,
}

/// Exporter for converting ledger data to external formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export a user's history to CSV format, one row per accepted
    /// mutation in append order. Returns the number of rows written.
    pub async fn export_history_csv<W: Write>(&self, user_id: UserId, writer: W) -> Result<usize> {
        let entries = self.service.get_history(user_id).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["user_id", "kind", "amount", "recorded_at"])?;

        let mut count = 0;
        for entry in &entries {
            csv_writer.write_record(&[
                entry.user_id.to_string(),
                entry.kind.as_str().to_string(),
                entry.amount.to_string(),
                entry.recorded_at.to_rfc3339(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export a user's balance and full history as a JSON snapshot.
    pub async fn export_user_json<W: Write>(
        &self,
        user_id: UserId,
        mut writer: W,
    ) -> Result<UserSnapshot> {
        let balance = self.service.get_balance(user_id).await?;
        let history = self.service.get_history(user_id).await?;

        let snapshot = UserSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            balance,
            history,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
