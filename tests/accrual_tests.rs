//! Reward accrual and rate derivation tests

mod common;

use common::{emission_project, fixed_apy_project, stake_account};
use solana_sdk::pubkey::Pubkey;
use stake_sync::chain::accounts::UserStakeAccount;
use stake_sync::rewards::accrual::{compute_owed, last_checkpoint, to_ui_amount, SECONDS_PER_YEAR};
use stake_sync::rewards::rate::{pool_rate, RateType};

const NOW: i64 = 1_750_000_000;

#[test]
fn zero_stake_never_accrues() {
    let mint = Pubkey::new_unique();
    let project = fixed_apy_project(mint, 0, 1000);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 0);
    stake.rewards_pending = 777;

    for now in [0, NOW, NOW + SECONDS_PER_YEAR, i64::MAX] {
        assert_eq!(compute_owed(&project, &stake, now), 777);
    }

    let emission = emission_project(mint, 0, 100, 1_000_000);
    assert_eq!(compute_owed(&emission, &stake, NOW), 777);
}

#[test]
fn fixed_apy_one_year_worked_example() {
    // 10% APY on 1 token at 9 decimals, staked exactly one year ago
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000_000);
    stake.last_claim_time = NOW - SECONDS_PER_YEAR;
    stake.rewards_pending = 0;

    assert_eq!(compute_owed(&project, &stake, NOW), 100_000_000);
}

#[test]
fn emission_proportional_share_worked_example() {
    // 50% share of 100 units/second over 10 seconds
    let project = emission_project(Pubkey::new_unique(), 0, 100, 1_000_000);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 500_000);
    stake.last_claim_time = NOW - 10;

    assert_eq!(compute_owed(&project, &stake, NOW), 500);
}

#[test]
fn emission_with_no_stakers_accrues_nothing() {
    let project = emission_project(Pubkey::new_unique(), 0, 1_000_000, 0);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 500_000);
    stake.last_claim_time = NOW - 1000;
    stake.rewards_pending = 42;

    assert_eq!(compute_owed(&project, &stake, NOW), 42);
}

#[test]
fn rewards_pending_is_preserved_and_added() {
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000_000);
    stake.last_claim_time = NOW - SECONDS_PER_YEAR;
    stake.rewards_pending = 5;

    assert_eq!(compute_owed(&project, &stake, NOW), 100_000_005);
}

#[test]
fn accrual_is_monotonic_while_pool_is_live() {
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1234);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 987_654_321);
    stake.last_claim_time = NOW;

    let mut previous = 0;
    for delta in (0..=3600).step_by(60) {
        let owed = compute_owed(&project, &stake, NOW + delta);
        assert!(owed >= previous, "owed decreased at delta {delta}");
        previous = owed;
    }
}

#[test]
fn no_accrual_past_pool_end() {
    let mut project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    project.pool_end_time = NOW + 100;
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000_000);
    stake.last_claim_time = NOW;

    let at_end = compute_owed(&project, &stake, project.pool_end_time);
    for extra in [1, 1000, SECONDS_PER_YEAR] {
        assert_eq!(compute_owed(&project, &stake, project.pool_end_time + extra), at_end);
    }
}

#[test]
fn checkpoint_after_pool_end_accrues_nothing() {
    let mut project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    project.pool_end_time = NOW - 500;
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000_000);
    stake.last_claim_time = NOW - 100;
    stake.rewards_pending = 9;

    assert_eq!(compute_owed(&project, &stake, NOW), 9);
}

#[test]
fn negative_time_delta_returns_pending() {
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000_000_000);
    stake.last_claim_time = NOW + 60;
    stake.rewards_pending = 11;

    assert_eq!(compute_owed(&project, &stake, NOW), 11);
}

#[test]
fn large_amounts_do_not_overflow() {
    // 10^18 raw units at 100% APY for a full year
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 10_000);
    let mut stake = stake_account(
        Pubkey::new_unique(),
        Pubkey::new_unique(),
        1_000_000_000_000_000_000,
    );
    stake.last_claim_time = NOW - SECONDS_PER_YEAR;

    assert_eq!(compute_owed(&project, &stake, NOW), 1_000_000_000_000_000_000);
}

#[test]
fn division_truncates_toward_zero() {
    // 1 bps over 1 second on a small stake rounds down to zero
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1);
    let mut stake = stake_account(Pubkey::new_unique(), Pubkey::new_unique(), 1_000);
    stake.last_claim_time = NOW - 1;

    assert_eq!(compute_owed(&project, &stake, NOW), 0);
}

#[test]
fn checkpoint_fallback_order() {
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);

    let mut stake = UserStakeAccount {
        owner: Pubkey::new_unique(),
        project: Pubkey::new_unique(),
        amount: 1,
        rewards_pending: 0,
        last_claim_time: 500,
        last_stake_time: 400,
    };
    assert_eq!(last_checkpoint(&stake, &project), 500);

    stake.last_claim_time = 0;
    assert_eq!(last_checkpoint(&stake, &project), 400);

    stake.last_stake_time = 0;
    assert_eq!(last_checkpoint(&stake, &project), project.last_update_time);
}

#[test]
fn fixed_apy_rate_is_bps_over_hundred() {
    let project = fixed_apy_project(Pubkey::new_unique(), 0, 1000);
    let rate = pool_rate(&project);
    assert_eq!(rate.rate_type, RateType::Apy);
    assert!((rate.rate - 10.0).abs() < f64::EPSILON);
}

#[test]
fn emission_rate_annualizes_against_principal() {
    // 1 unit/sec against a principal of one year's emission => 100% APR
    let project = emission_project(Pubkey::new_unique(), 0, 1, SECONDS_PER_YEAR as u64);
    let rate = pool_rate(&project);
    assert_eq!(rate.rate_type, RateType::Apr);
    assert!((rate.rate - 100.0).abs() < f64::EPSILON);
}

#[test]
fn emission_rate_zero_guards() {
    let empty = emission_project(Pubkey::new_unique(), 0, 100, 0);
    assert_eq!(pool_rate(&empty).rate, 0.0);
    assert_eq!(pool_rate(&empty).rate_type, RateType::Apr);

    let idle = emission_project(Pubkey::new_unique(), 0, 0, 1_000_000);
    assert_eq!(pool_rate(&idle).rate, 0.0);
}

#[test]
fn ui_amount_applies_decimals() {
    assert!((to_ui_amount(1_500_000_000, 9) - 1.5).abs() < 1e-12);
    assert!((to_ui_amount(25, 0) - 25.0).abs() < f64::EPSILON);
}
