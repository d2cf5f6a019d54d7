//! Display-rate derivation from a decoded pool account

use serde::{Deserialize, Serialize};

use super::accrual::SECONDS_PER_YEAR;
use crate::chain::accounts::{ProjectAccount, RateMode};

/// How a displayed rate was derived
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Apr,
    Apy,
}

/// Annualized display rate for a pool, in percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PoolRate {
    pub rate: f64,
    pub rate_type: RateType,
}

/// Derive the display rate from a decoded pool account.
///
/// Fixed-APY pools report their configured rate directly. Emission
/// pools report the current annualized emission as a percentage of the
/// currently-staked principal, which is zero while the pool is empty
/// or emitting nothing.
pub fn pool_rate(project: &ProjectAccount) -> PoolRate {
    match project.rate_mode {
        RateMode::FixedApy => PoolRate {
            rate: project.rate_bps_per_year as f64 / 100.0,
            rate_type: RateType::Apy,
        },
        RateMode::Emission => {
            if project.total_staked == 0 || project.reward_rate_per_second == 0 {
                return PoolRate {
                    rate: 0.0,
                    rate_type: RateType::Apr,
                };
            }
            let bps = (project.reward_rate_per_second as u128)
                * (SECONDS_PER_YEAR as u128)
                * 10_000
                / (project.total_staked as u128);
            PoolRate {
                rate: bps as f64 / 100.0,
                rate_type: RateType::Apr,
            }
        }
    }
}
