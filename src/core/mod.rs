//! Core domain: error taxonomy, shared types, and port traits

pub mod error;
pub mod traits;
pub mod types;

pub use error::{SyncError, SyncResult};
pub use traits::{ChainReader, StakeStore};
pub use types::{FleetReport, PoolKey, PoolRow, StakeKey, StakeRow, SyncAction, SyncOutcome};
