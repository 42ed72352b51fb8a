mod common;

use std::sync::Arc;

use common::test_service;
use punctum::domain::{LedgerError, MAX_BALANCE, OperationKind};

#[tokio::test]
async fn test_new_user_reads_as_zero() {
    let service = test_service();

    let balance = service.get_balance(100).await.unwrap();
    assert_eq!(balance.user_id, 100);
    assert_eq!(balance.points, 0);
}

#[tokio::test]
async fn test_invalid_user_id_rejected_everywhere() {
    let service = test_service();

    for user_id in [0, -1] {
        assert!(matches!(
            service.get_balance(user_id).await,
            Err(LedgerError::InvalidUserId { .. })
        ));
        assert!(matches!(
            service.charge_for_user(user_id, 10_000).await,
            Err(LedgerError::InvalidUserId { .. })
        ));
        assert!(matches!(
            service.use_for_user(user_id, 1_000).await,
            Err(LedgerError::InvalidUserId { .. })
        ));
        assert!(matches!(
            service.get_history(user_id).await,
            Err(LedgerError::InvalidUserId { .. })
        ));
    }
}

#[tokio::test]
async fn test_charge_updates_balance_and_history() {
    let service = test_service();

    let balance = service.charge_for_user(1, 10_000).await.unwrap();
    assert_eq!(balance.points, 10_000);

    let history = service.get_history(1).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, OperationKind::Charge);
    assert_eq!(history[0].amount, 10_000);
}

#[tokio::test]
async fn test_rejected_charge_leaves_state_untouched() {
    let service = test_service();

    service.charge_for_user(1, 10_000).await.unwrap();

    assert!(matches!(
        service.charge_for_user(1, 9_999).await,
        Err(LedgerError::InvalidChargeAmount { amount: 9_999 })
    ));
    assert!(matches!(
        service.charge_for_user(1, 200_001).await,
        Err(LedgerError::InvalidChargeAmount { amount: 200_001 })
    ));

    let balance = service.get_balance(1).await.unwrap();
    assert_eq!(balance.points, 10_000);
    assert_eq!(service.get_history(1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_charge_overflow_rejected() {
    let service = test_service();

    // Ten maximum charges reach the cap exactly
    for _ in 0..10 {
        service.charge_for_user(1, 200_000).await.unwrap();
    }
    let balance = service.get_balance(1).await.unwrap();
    assert_eq!(balance.points, MAX_BALANCE);

    assert!(matches!(
        service.charge_for_user(1, 10_000).await,
        Err(LedgerError::ChargeOverflow { .. })
    ));
    let balance = service.get_balance(1).await.unwrap();
    assert_eq!(balance.points, MAX_BALANCE);
}

#[tokio::test]
async fn test_use_updates_balance_and_history() {
    let service = test_service();

    service.charge_for_user(2, 20_000).await.unwrap();
    let balance = service.use_for_user(2, 1_000).await.unwrap();
    assert_eq!(balance.points, 19_000);

    let history = service.get_history(2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].kind, OperationKind::Use);
    assert_eq!(history[1].amount, 1_000);
}

#[tokio::test]
async fn test_use_amount_bounds() {
    let service = test_service();

    service.charge_for_user(1, 100_000).await.unwrap();

    assert!(matches!(
        service.use_for_user(1, 999).await,
        Err(LedgerError::InvalidUseAmount { amount: 999 })
    ));
    assert!(matches!(
        service.use_for_user(1, 1_000_001).await,
        Err(LedgerError::InvalidUseAmount { amount: 1_000_001 })
    ));

    let balance = service.get_balance(1).await.unwrap();
    assert_eq!(balance.points, 100_000);
}

#[tokio::test]
async fn test_overdraw_rejected_without_side_effects() {
    let service = test_service();

    service.charge_for_user(3, 10_000).await.unwrap();

    assert!(matches!(
        service.use_for_user(3, 20_000).await,
        Err(LedgerError::InsufficientBalance {
            points: 10_000,
            requested: 20_000,
        })
    ));

    let balance = service.get_balance(3).await.unwrap();
    assert_eq!(balance.points, 10_000);
    assert_eq!(service.get_history(3).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_balance_is_idempotent() {
    let service = test_service();

    service.charge_for_user(5, 50_000).await.unwrap();

    let first = service.get_balance(5).await.unwrap();
    let second = service.get_balance(5).await.unwrap();
    assert_eq!(first.points, second.points);
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn test_concurrent_charges_on_one_user_serialize() {
    let service = Arc::new(test_service());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.charge_for_user(9, 10_000).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let balance = service.get_balance(9).await.unwrap();
    assert_eq!(balance.points, 80_000);
    assert_eq!(service.get_history(9).await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_users_are_independent() {
    let service = test_service();

    service.charge_for_user(1, 10_000).await.unwrap();
    service.charge_for_user(2, 20_000).await.unwrap();
    service.use_for_user(2, 1_000).await.unwrap();

    assert_eq!(service.get_balance(1).await.unwrap().points, 10_000);
    assert_eq!(service.get_balance(2).await.unwrap().points, 19_000);
    assert_eq!(service.get_history(1).await.unwrap().len(), 1);
    assert_eq!(service.get_history(2).await.unwrap().len(), 2);
}
