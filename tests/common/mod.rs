//! Shared test fixtures: an in-memory chain reader and account builders

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

use stake_sync::cache::Clock;
use stake_sync::chain::accounts::{
    encode_account, ProjectAccount, RateMode, UserStakeAccount, PROJECT_DISCRIMINATOR,
    USER_STAKE_DISCRIMINATOR,
};
use stake_sync::core::error::{SyncError, SyncResult};
use stake_sync::core::traits::ChainReader;

/// Chain reader over an in-memory account map, with failure injection
/// and call accounting
#[derive(Default)]
pub struct MockChain {
    accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    pub fail: AtomicBool,
    pub multi_calls: AtomicUsize,
    pub batch_sizes: Mutex<Vec<usize>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account(&self, address: Pubkey, data: Vec<u8>) {
        self.accounts.lock().unwrap().insert(address, data);
    }

    pub fn remove_account(&self, address: &Pubkey) {
        self.accounts.lock().unwrap().remove(address);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check_failure(&self) -> SyncResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            Err(SyncError::Transient("injected RPC failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_account(&self, address: &Pubkey) -> SyncResult<Option<Vec<u8>>> {
        self.check_failure()?;
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> SyncResult<Vec<Option<Vec<u8>>>> {
        self.check_failure()?;
        self.multi_calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(addresses.len());
        let accounts = self.accounts.lock().unwrap();
        Ok(addresses.iter().map(|a| accounts.get(a).cloned()).collect())
    }

    async fn get_program_accounts_memcmp(
        &self,
        offset: usize,
        bytes: &[u8],
    ) -> SyncResult<Vec<(Pubkey, Vec<u8>)>> {
        self.check_failure()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .filter(|(_, data)| {
                data.len() >= offset + bytes.len() && &data[offset..offset + bytes.len()] == bytes
            })
            .map(|(pubkey, data)| (*pubkey, data.clone()))
            .collect())
    }
}

/// Manually advanced clock for TTL tests
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

pub fn fixed_apy_project(mint: Pubkey, pool_id: u16, rate_bps_per_year: u32) -> ProjectAccount {
    ProjectAccount {
        mint,
        pool_id,
        rate_mode: RateMode::FixedApy,
        rate_bps_per_year,
        reward_rate_per_second: 0,
        total_staked: 0,
        pool_end_time: i64::MAX,
        last_update_time: 1_700_000_000,
        decimals: 9,
    }
}

pub fn emission_project(
    mint: Pubkey,
    pool_id: u16,
    reward_rate_per_second: u64,
    total_staked: u64,
) -> ProjectAccount {
    ProjectAccount {
        mint,
        pool_id,
        rate_mode: RateMode::Emission,
        rate_bps_per_year: 0,
        reward_rate_per_second,
        total_staked,
        pool_end_time: i64::MAX,
        last_update_time: 1_700_000_000,
        decimals: 9,
    }
}

pub fn stake_account(owner: Pubkey, project: Pubkey, amount: u64) -> UserStakeAccount {
    UserStakeAccount {
        owner,
        project,
        amount,
        rewards_pending: 0,
        last_claim_time: 0,
        last_stake_time: 1_700_000_000,
    }
}

pub fn encode_project(project: &ProjectAccount) -> Vec<u8> {
    encode_account(&PROJECT_DISCRIMINATOR, project)
}

pub fn encode_stake(stake: &UserStakeAccount) -> Vec<u8> {
    encode_account(&USER_STAKE_DISCRIMINATOR, stake)
}
