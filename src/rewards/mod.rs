//! Reward accrual math and rate derivation
//!
//! Pure functions over decoded on-chain state. No I/O, no clocks: the
//! evaluation time is always an argument, so callers re-evaluate on
//! every query rather than memoizing a function of wall-clock time.

pub mod accrual;
pub mod rate;

pub use accrual::{compute_owed, last_checkpoint, to_ui_amount, SECONDS_PER_YEAR};
pub use rate::{pool_rate, PoolRate, RateType};
