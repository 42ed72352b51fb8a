use thiserror::Error;

use super::{Points, UserId};

/// Every way a ledger operation can be rejected.
///
/// All variants except `Storage` are caller input or business-rule
/// violations and carry the offending values; `Storage` passes through
/// infrastructure failures from a store implementation.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid user id: {user_id}")]
    InvalidUserId { user_id: UserId },

    #[error("Invalid charge amount: {amount} (allowed 10000..=200000)")]
    InvalidChargeAmount { amount: Points },

    #[error("Charge of {amount} on balance {points} would exceed the maximum balance")]
    ChargeOverflow { points: Points, amount: Points },

    #[error("Invalid use amount: {amount} (allowed 1000..=1000000)")]
    InvalidUseAmount { amount: Points },

    #[error("Insufficient balance: have {points}, requested {requested}")]
    InsufficientBalance { points: Points, requested: Points },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
