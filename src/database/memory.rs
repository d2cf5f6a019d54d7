//! In-memory stake store
//!
//! Backs the test suite and local development; behaviorally equivalent
//! to the Postgres store for everything the reconcilers rely on.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use crate::core::error::SyncResult;
use crate::core::traits::StakeStore;
use crate::core::types::{PoolKey, PoolRow, StakeKey, StakeRow};

#[derive(Default)]
pub struct MemoryStore {
    stakes: Mutex<HashMap<StakeKey, StakeRow>>,
    pools: Mutex<HashMap<PoolKey, PoolRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stake_count(&self) -> usize {
        self.stakes.lock().expect("memory store lock poisoned").len()
    }
}

#[async_trait]
impl StakeStore for MemoryStore {
    async fn upsert_stake(&self, row: &StakeRow) -> SyncResult<()> {
        self.stakes
            .lock()
            .expect("memory store lock poisoned")
            .insert(row.key(), row.clone());
        Ok(())
    }

    async fn get_stake(&self, key: &StakeKey) -> SyncResult<Option<StakeRow>> {
        Ok(self
            .stakes
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned())
    }

    async fn delete_stake(&self, key: &StakeKey) -> SyncResult<bool> {
        Ok(self
            .stakes
            .lock()
            .expect("memory store lock poisoned")
            .remove(key)
            .is_some())
    }

    async fn delete_stake_by_pda(&self, stake_pda: &Pubkey) -> SyncResult<bool> {
        let mut stakes = self.stakes.lock().expect("memory store lock poisoned");
        let keys: Vec<StakeKey> = stakes
            .values()
            .filter(|row| row.stake_pda == *stake_pda)
            .map(|row| row.key())
            .collect();
        for key in &keys {
            stakes.remove(key);
        }
        Ok(!keys.is_empty())
    }

    async fn list_stakes(&self) -> SyncResult<Vec<StakeRow>> {
        Ok(self
            .stakes
            .lock()
            .expect("memory store lock poisoned")
            .values()
            .cloned()
            .collect())
    }

    async fn upsert_pool(&self, row: &PoolRow) -> SyncResult<()> {
        self.pools
            .lock()
            .expect("memory store lock poisoned")
            .insert(row.key(), row.clone());
        Ok(())
    }

    async fn list_pools(&self) -> SyncResult<Vec<PoolRow>> {
        Ok(self
            .pools
            .lock()
            .expect("memory store lock poisoned")
            .values()
            .cloned()
            .collect())
    }
}
