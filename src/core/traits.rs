//! Core trait abstractions (Ports in Hexagonal Architecture)

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use super::error::SyncResult;
use super::types::{PoolRow, StakeKey, StakeRow};

/// Read-only on-chain account access.
///
/// Absence of an account is `Ok(None)`, never an error; transport
/// failures and timeouts surface as `SyncError::Transient` so callers
/// can distinguish "no stake" from "could not look".
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fetch one account's raw data
    async fn get_account(&self, address: &Pubkey) -> SyncResult<Option<Vec<u8>>>;

    /// Fetch many accounts in a single round trip, preserving order
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> SyncResult<Vec<Option<Vec<u8>>>>;

    /// Scan all program accounts whose data matches `bytes` at `offset`
    /// (used to select accounts by their 8-byte type discriminator)
    async fn get_program_accounts_memcmp(
        &self,
        offset: usize,
        bytes: &[u8],
    ) -> SyncResult<Vec<(Pubkey, Vec<u8>)>>;
}

/// Storage port - the persistent stake/pool cache.
///
/// Writes are only ever issued with values decoded from a fresh chain
/// read within the same operation, never from caller input.
#[async_trait]
pub trait StakeStore: Send + Sync {
    /// Insert or update a stake row, keyed on (wallet, mint, pool_id)
    async fn upsert_stake(&self, row: &StakeRow) -> SyncResult<()>;

    /// Get a stake row by key
    async fn get_stake(&self, key: &StakeKey) -> SyncResult<Option<StakeRow>>;

    /// Delete a stake row by key; deleting a missing row is success
    /// and returns false
    async fn delete_stake(&self, key: &StakeKey) -> SyncResult<bool>;

    /// Delete any stake row holding this on-chain account address
    async fn delete_stake_by_pda(&self, stake_pda: &Pubkey) -> SyncResult<bool>;

    /// All cached stake rows, for the staleness sweep
    async fn list_stakes(&self) -> SyncResult<Vec<StakeRow>>;

    /// Insert or update a pool mirror row, keyed on (mint, pool_id)
    async fn upsert_pool(&self, row: &PoolRow) -> SyncResult<()>;

    /// All known pools
    async fn list_pools(&self) -> SyncResult<Vec<PoolRow>>;
}
