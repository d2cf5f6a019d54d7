//! Cache reconciliation against on-chain truth

pub mod fleet;
pub mod stake;

pub use fleet::FleetReconciler;
pub use stake::StakeReconciler;
