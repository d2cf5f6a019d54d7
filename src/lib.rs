//! Stake reconciliation library
//!
//! Keeps an off-chain Postgres cache of per-user stake records
//! consistent with the authoritative on-chain staking program, and
//! computes time-accrued rewards from decoded on-chain state. Consumed
//! as a library by the platform's HTTP handlers; the `stake-syncd`
//! binary runs periodic fleet reconciliation.

pub mod cache;
pub mod chain;
pub mod config;
pub mod core;
pub mod database;
pub mod rewards;
pub mod sync;

// Re-export commonly used types
pub use cache::{RateCache, SystemClock};
pub use chain::{ProjectAccount, RateMode, RpcReader, UserStakeAccount};
pub use config::SyncConfig;
pub use crate::core::{
    ChainReader, FleetReport, PoolKey, PoolRow, StakeKey, StakeRow, StakeStore, SyncError,
    SyncOutcome, SyncResult,
};
pub use database::{MemoryStore, PostgresStore};
pub use rewards::{compute_owed, pool_rate, PoolRate};
pub use sync::{FleetReconciler, StakeReconciler};
