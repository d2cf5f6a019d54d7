//! Time-accrued staking reward calculation
//!
//! All core arithmetic is done in u128 with every multiplication before
//! the single truncating division, so large raw amounts (9-decimal
//! tokens at large supplies) cannot overflow or drift. Floating point
//! appears only in the presentation helper.

use crate::chain::accounts::{ProjectAccount, RateMode, UserStakeAccount};

pub const SECONDS_PER_YEAR: i64 = 31_536_000;
const BPS_DENOMINATOR: u128 = 10_000;

/// Last checkpoint after which new accrual must be computed.
///
/// Ordered fallback policy: the last claim time wins when set, then the
/// stake creation time, then the pool's own last-update time. A zero
/// timestamp means the field was never set on chain.
pub fn last_checkpoint(stake: &UserStakeAccount, project: &ProjectAccount) -> i64 {
    if stake.last_claim_time > 0 {
        stake.last_claim_time
    } else if stake.last_stake_time > 0 {
        stake.last_stake_time
    } else {
        project.last_update_time
    }
}

/// Rewards owed to `stake` at `now`, in raw reward-token units.
///
/// Returns `rewards_pending` plus whatever accrued since the last
/// checkpoint, clamped at the pool's end time. Zero stake never
/// accrues, and emission pools with no stakers accrue nothing rather
/// than dividing by zero.
pub fn compute_owed(project: &ProjectAccount, stake: &UserStakeAccount, now: i64) -> u64 {
    if stake.amount == 0 {
        return stake.rewards_pending;
    }

    let last_update = last_checkpoint(stake, project);
    if now <= last_update {
        return stake.rewards_pending;
    }

    // Rewards never accrue past pool end
    let effective_time = if now > project.pool_end_time {
        (project.pool_end_time - last_update).max(0)
    } else {
        now - last_update
    };
    if effective_time <= 0 {
        return stake.rewards_pending;
    }

    let earned: u128 = match project.rate_mode {
        RateMode::FixedApy => {
            (stake.amount as u128) * (project.rate_bps_per_year as u128) * (effective_time as u128)
                / (BPS_DENOMINATOR * SECONDS_PER_YEAR as u128)
        }
        RateMode::Emission => {
            if project.total_staked == 0 {
                return stake.rewards_pending;
            }
            (stake.amount as u128)
                * (project.reward_rate_per_second as u128)
                * (effective_time as u128)
                / (project.total_staked as u128)
        }
    };

    stake
        .rewards_pending
        .saturating_add(u64::try_from(earned).unwrap_or(u64::MAX))
}

/// Convert a raw integer amount to a human-readable token quantity.
/// Presentation boundary only; never feeds back into reward math.
pub fn to_ui_amount(raw: u64, decimals: u8) -> f64 {
    raw as f64 / 10f64.powi(decimals as i32)
}
