//! Fleet-wide stake reconciliation
//!
//! One filtered program-account scan reconciles the whole cache: every
//! live on-chain stake is upserted, then a sweep removes cache rows
//! whose stake account no longer exists on chain. The upsert pass fully
//! completes before the sweep begins, so accounts fetched in the same
//! run can never be deleted for "not found".
//!
//! Per-account decode and pool-match failures are counted and skipped;
//! only a failure of the initial scan aborts the run.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, warn};

use crate::chain::accounts::{decode_user_stake, USER_STAKE_DISCRIMINATOR};
use crate::chain::pda::derive_project_address;
use crate::core::error::SyncResult;
use crate::core::traits::{ChainReader, StakeStore};
use crate::core::types::{FleetReport, PoolKey, StakeRow};

/// Reconciles the entire stake cache against a program-account scan
pub struct FleetReconciler {
    chain: Arc<dyn ChainReader>,
    store: Arc<dyn StakeStore>,
    program_id: Pubkey,
}

impl FleetReconciler {
    pub fn new(chain: Arc<dyn ChainReader>, store: Arc<dyn StakeStore>, program_id: Pubkey) -> Self {
        Self {
            chain,
            store,
            program_id,
        }
    }

    /// Run one full reconciliation pass. Intended for periodic or
    /// administrative invocation, not per-request.
    pub async fn sync_all(&self) -> SyncResult<FleetReport> {
        // Single round trip for the whole fleet; failure here aborts the run
        let accounts = self
            .chain
            .get_program_accounts_memcmp(0, &USER_STAKE_DISCRIMINATOR)
            .await?;
        info!(accounts = accounts.len(), "fleet scan fetched stake accounts");

        // Known pools by their derived project address. O(pools) space,
        // O(1) match per stake account.
        let pools = self.store.list_pools().await?;
        let pool_index: HashMap<Pubkey, PoolKey> = pools
            .iter()
            .map(|pool| {
                (
                    derive_project_address(&self.program_id, &pool.mint, pool.pool_id),
                    pool.key(),
                )
            })
            .collect();

        let live_pdas: HashSet<Pubkey> = accounts.iter().map(|(pda, _)| *pda).collect();

        let mut report = FleetReport::default();
        for (stake_pda, bytes) in &accounts {
            let stake = match decode_user_stake(bytes) {
                Ok(stake) => stake,
                Err(e) => {
                    warn!(account = %stake_pda, error = %e, "skipping undecodable stake account");
                    report.skipped += 1;
                    continue;
                }
            };

            if stake.amount == 0 {
                debug!(account = %stake_pda, "skipping zero-amount stake account");
                report.skipped += 1;
                continue;
            }

            let Some(pool) = pool_index.get(&stake.project) else {
                warn!(
                    account = %stake_pda,
                    project = %stake.project,
                    "stake account references no known pool, skipping"
                );
                report.skipped += 1;
                continue;
            };

            self.store
                .upsert_stake(&StakeRow {
                    wallet: stake.owner,
                    mint: pool.mint,
                    pool_id: pool.pool_id,
                    amount: stake.amount,
                    rewards_pending: stake.rewards_pending,
                    stake_pda: *stake_pda,
                    updated_at: Utc::now(),
                })
                .await?;
            report.synced += 1;
        }

        // Staleness sweep, strictly after every upsert has completed
        for row in self.store.list_stakes().await? {
            if !live_pdas.contains(&row.stake_pda) {
                if self.store.delete_stake_by_pda(&row.stake_pda).await? {
                    debug!(account = %row.stake_pda, wallet = %row.wallet, "swept stale cache row");
                    report.deleted += 1;
                }
            }
        }

        info!(
            synced = report.synced,
            deleted = report.deleted,
            skipped = report.skipped,
            "fleet reconciliation complete"
        );
        Ok(report)
    }
}
