use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::LedgerError;

pub type UserId = i64;

/// Points are whole units in the smallest denomination; no fractional
/// amounts exist anywhere in the system.
pub type Points = i64;

/// Hard cap on any user's balance.
pub const MAX_BALANCE: Points = 2_000_000;
/// Smallest accepted charge amount.
pub const MIN_CHARGE: Points = 10_000;
/// Largest accepted charge amount.
pub const MAX_CHARGE: Points = 200_000;
/// Smallest accepted use amount.
pub const MIN_USE: Points = 1_000;
/// Largest accepted use amount.
pub const MAX_USE: Points = 1_000_000;

/// A user's point balance at a moment in time.
///
/// The entity is a value: `charge` and `use_points` validate and return the
/// would-be new balance without touching `self`, leaving persistence to the
/// caller. `points` stays within `0..=MAX_BALANCE` on every accepted path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Balance {
    pub user_id: UserId,
    pub points: Points,
    pub updated_at: DateTime<Utc>,
}

impl Balance {
    pub fn new(user_id: UserId, points: Points, updated_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            points,
            updated_at,
        }
    }

    /// Balance for a user with no stored record: zero points, stamped now.
    /// Not persisted until the first accepted mutation.
    pub fn empty(user_id: UserId) -> Self {
        Self::new(user_id, 0, Utc::now())
    }

    /// Validate a charge and return the new balance value.
    ///
    /// The amount must fall within `[MIN_CHARGE, MAX_CHARGE]` and the result
    /// must not exceed `MAX_BALANCE`.
    pub fn charge(&self, amount: Points) -> Result<Points, LedgerError> {
        if !(MIN_CHARGE..=MAX_CHARGE).contains(&amount) {
            return Err(LedgerError::InvalidChargeAmount { amount });
        }
        if self.points + amount > MAX_BALANCE {
            return Err(LedgerError::ChargeOverflow {
                points: self.points,
                amount,
            });
        }
        Ok(self.points + amount)
    }

    /// Validate a use and return the new balance value.
    ///
    /// The amount must fall within `[MIN_USE, MAX_USE]` and the balance may
    /// never go negative.
    pub fn use_points(&self, amount: Points) -> Result<Points, LedgerError> {
        if !(MIN_USE..=MAX_USE).contains(&amount) {
            return Err(LedgerError::InvalidUseAmount { amount });
        }
        if self.points - amount < 0 {
            return Err(LedgerError::InsufficientBalance {
                points: self.points,
                requested: amount,
            });
        }
        Ok(self.points - amount)
    }
}
