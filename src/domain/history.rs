use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Points, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Balance increased by a bounded amount
    Charge,
    /// Balance decreased by a bounded amount
    Use,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Charge => "charge",
            OperationKind::Use => "use",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "charge" => Some(OperationKind::Charge),
            "use" => Some(OperationKind::Use),
            _ => None,
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One accepted mutation on a user's balance.
///
/// Entries are immutable and appended per user in operation order; the
/// amount is the magnitude of the operation, never signed. History is an
/// audit log — the current balance lives in the balance store, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user_id: UserId,
    pub amount: Points,
    pub kind: OperationKind,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        user_id: UserId,
        amount: Points,
        kind: OperationKind,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        assert!(amount > 0, "History amount must be positive");
        Self {
            user_id,
            amount,
            kind,
            recorded_at,
        }
    }
}
