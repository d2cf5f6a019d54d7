//! Core domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

/// Identity of a pool: token mint plus integer pool index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub mint: Pubkey,
    pub pool_id: u16,
}

impl PoolKey {
    pub fn new(mint: Pubkey, pool_id: u16) -> Self {
        Self { mint, pool_id }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.mint, self.pool_id)
    }
}

/// Identity of a cached stake row: (wallet, mint, pool_id)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StakeKey {
    pub wallet: Pubkey,
    pub mint: Pubkey,
    pub pool_id: u16,
}

impl StakeKey {
    pub fn new(wallet: Pubkey, mint: Pubkey, pool_id: u16) -> Self {
        Self {
            wallet,
            mint,
            pool_id,
        }
    }

    pub fn pool(&self) -> PoolKey {
        PoolKey::new(self.mint, self.pool_id)
    }
}

/// Cached stake row, always derived from a verified chain read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StakeRow {
    pub wallet: Pubkey,
    pub mint: Pubkey,
    pub pool_id: u16,
    /// Raw staked quantity as decoded from the chain
    pub amount: u64,
    /// Credited-but-unclaimed rewards as of the last on-chain checkpoint
    pub rewards_pending: u64,
    /// Address of the on-chain stake account this row mirrors
    pub stake_pda: Pubkey,
    pub updated_at: DateTime<Utc>,
}

impl StakeRow {
    pub fn key(&self) -> StakeKey {
        StakeKey::new(self.wallet, self.mint, self.pool_id)
    }
}

/// Cached pool row, a display-only mirror of the on-chain project account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolRow {
    pub mint: Pubkey,
    pub pool_id: u16,
    pub decimals: u8,
    /// Display mirror only; emission-mode reward math always reads the
    /// chain-authoritative copy.
    pub total_staked: u64,
    pub updated_at: DateTime<Utc>,
}

impl PoolRow {
    pub fn key(&self) -> PoolKey {
        PoolKey::new(self.mint, self.pool_id)
    }
}

/// What a per-user sync did to the cache
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncAction {
    Upserted,
    Deleted,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Upserted => write!(f, "upserted"),
            SyncAction::Deleted => write!(f, "deleted"),
        }
    }
}

/// Outcome of a per-user sync, for caller auditing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncOutcome {
    pub action: SyncAction,
    /// Present when the action was an upsert
    pub amount: Option<u64>,
}

impl SyncOutcome {
    pub fn upserted(amount: u64) -> Self {
        Self {
            action: SyncAction::Upserted,
            amount: Some(amount),
        }
    }

    pub fn deleted() -> Self {
        Self {
            action: SyncAction::Deleted,
            amount: None,
        }
    }
}

/// Aggregate result of one full fleet reconciliation run.
///
/// `synced` counts every successfully reconciled row, not just changed
/// ones, so a no-change rerun still reports the full count. `deleted`
/// counts only genuinely stale rows removed by the sweep.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FleetReport {
    pub synced: usize,
    pub deleted: usize,
    /// Accounts skipped for zero amount, decode failure, or no matching pool
    pub skipped: usize,
}
