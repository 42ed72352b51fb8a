// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use punctum::application::LedgerService;
use punctum::storage::JsonStore;
use tempfile::TempDir;

/// Helper to create a test service over in-memory stores
pub fn test_service() -> LedgerService {
    LedgerService::in_memory()
}

/// Helper to create a test service over a temporary JSON store file
pub fn test_json_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store_path = temp_dir.path().join("ledger.json");
    let store = Arc::new(JsonStore::open(&store_path)?);
    let service = LedgerService::new(store.clone(), store);
    Ok((service, temp_dir))
}
