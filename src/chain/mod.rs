//! On-chain access: lightweight RPC reader, account layouts, address derivation

pub mod accounts;
pub mod pda;
pub mod rpc;

pub use accounts::{
    decode_project, decode_user_stake, ProjectAccount, RateMode, UserStakeAccount,
    PROJECT_DISCRIMINATOR, USER_STAKE_DISCRIMINATOR,
};
pub use pda::{derive_project_address, derive_user_stake_address};
pub use rpc::RpcReader;
