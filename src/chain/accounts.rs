//! Decoded on-chain account layouts for the staking program
//!
//! The program's binary layout is Anchor/borsh: an 8-byte account-type
//! discriminator followed by the borsh-encoded body. Decoding fails
//! closed: short buffers, wrong discriminators, and malformed bodies
//! all surface as `SyncError::Decode` rather than defaulting fields.

use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::core::error::{SyncError, SyncResult};

/// sha256("account:Project")[..8]
pub const PROJECT_DISCRIMINATOR: [u8; 8] = [205, 168, 189, 202, 181, 247, 142, 19];

/// sha256("account:UserStake")[..8]
pub const USER_STAKE_DISCRIMINATOR: [u8; 8] = [102, 53, 163, 107, 9, 138, 87, 153];

/// Reward accrual regime for a pool. Immutable once the pool is
/// initialized; not derivable from the rate fields themselves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, AnchorSerialize, AnchorDeserialize, Serialize, Deserialize,
)]
pub enum RateMode {
    /// Constant annualized rate in basis points, independent of other stakers
    FixedApy,
    /// Fixed pool-wide emission shared proportionally among current stakers
    Emission,
}

/// On-chain pool (project) account
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct ProjectAccount {
    pub mint: Pubkey,
    pub pool_id: u16,
    pub rate_mode: RateMode,
    /// Basis points per year; meaningful only in fixed-APY mode
    pub rate_bps_per_year: u32,
    /// Reward-token units per second; meaningful only in emission mode
    pub reward_rate_per_second: u64,
    /// Sum of all active stake amounts, chain-authoritative
    pub total_staked: u64,
    /// Unix timestamp after which no further rewards accrue
    pub pool_end_time: i64,
    /// Last on-chain pool-level rate checkpoint
    pub last_update_time: i64,
    pub decimals: u8,
}

/// On-chain per-user stake account
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct UserStakeAccount {
    pub owner: Pubkey,
    /// The project account this stake belongs to
    pub project: Pubkey,
    /// Raw staked quantity; zero means "no stake"
    pub amount: u64,
    /// Credited but unclaimed rewards as of `last_claim_time`
    pub rewards_pending: u64,
    /// Last claim checkpoint; zero when the user has never claimed
    pub last_claim_time: i64,
    /// Stake creation time; zero when unset
    pub last_stake_time: i64,
}

fn strip_discriminator<'a>(
    account_type: &'static str,
    discriminator: &[u8; 8],
    data: &'a [u8],
) -> SyncResult<&'a [u8]> {
    if data.len() < 8 {
        return Err(SyncError::Decode {
            account_type,
            reason: format!("buffer too short: {} bytes", data.len()),
        });
    }
    if &data[..8] != discriminator {
        return Err(SyncError::Decode {
            account_type,
            reason: "discriminator mismatch".to_string(),
        });
    }
    Ok(&data[8..])
}

/// Decode a project account, verifying its discriminator
pub fn decode_project(data: &[u8]) -> SyncResult<ProjectAccount> {
    let mut body = strip_discriminator("Project", &PROJECT_DISCRIMINATOR, data)?;
    ProjectAccount::deserialize(&mut body).map_err(|e| SyncError::Decode {
        account_type: "Project",
        reason: e.to_string(),
    })
}

/// Decode a user stake account, verifying its discriminator
pub fn decode_user_stake(data: &[u8]) -> SyncResult<UserStakeAccount> {
    let mut body = strip_discriminator("UserStake", &USER_STAKE_DISCRIMINATOR, data)?;
    UserStakeAccount::deserialize(&mut body).map_err(|e| SyncError::Decode {
        account_type: "UserStake",
        reason: e.to_string(),
    })
}

/// Encode an account body behind its discriminator. Used by tests and
/// local tooling; the program itself owns the layout.
pub fn encode_account<T: AnchorSerialize>(discriminator: &[u8; 8], body: &T) -> Vec<u8> {
    let mut out = discriminator.to_vec();
    body.serialize(&mut out).expect("vec write is infallible");
    out
}
