//! Deterministic program-derived addresses for the staking program
//!
//! Pure functions of their inputs; every reconciler operation relies on
//! these to locate pool and stake accounts without scanning.

use solana_sdk::pubkey::Pubkey;

pub const PROJECT_SEED: &[u8] = b"project";
pub const USER_STAKE_SEED: &[u8] = b"user_stake";

/// Address of the pool (project) account for (mint, pool_id)
pub fn derive_project_address(program_id: &Pubkey, mint: &Pubkey, pool_id: u16) -> Pubkey {
    Pubkey::find_program_address(
        &[PROJECT_SEED, mint.as_ref(), &pool_id.to_le_bytes()],
        program_id,
    )
    .0
}

/// Address of a user's stake account for a given project
pub fn derive_user_stake_address(
    program_id: &Pubkey,
    project: &Pubkey,
    wallet: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[USER_STAKE_SEED, project.as_ref(), wallet.as_ref()],
        program_id,
    )
    .0
}
