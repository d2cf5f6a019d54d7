//! Per-user stake reconciliation
//!
//! Makes one cached stake row match the authoritative on-chain account.
//! Persisted amounts are always taken from a chain read performed inside
//! the same operation, never from caller input. A transient RPC failure
//! aborts the operation before any write.

use std::sync::Arc;

use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::chain::accounts::decode_user_stake;
use crate::chain::pda::{derive_project_address, derive_user_stake_address};
use crate::core::error::{SyncError, SyncResult};
use crate::core::traits::{ChainReader, StakeStore};
use crate::core::types::{StakeKey, StakeRow, SyncOutcome};

/// Reconciles a single (wallet, mint, pool_id) cache row with the chain
pub struct StakeReconciler {
    chain: Arc<dyn ChainReader>,
    store: Arc<dyn StakeStore>,
    program_id: Pubkey,
}

impl StakeReconciler {
    pub fn new(chain: Arc<dyn ChainReader>, store: Arc<dyn StakeStore>, program_id: Pubkey) -> Self {
        Self {
            chain,
            store,
            program_id,
        }
    }

    fn stake_address(&self, key: &StakeKey) -> Pubkey {
        let project = derive_project_address(&self.program_id, &key.mint, key.pool_id);
        derive_user_stake_address(&self.program_id, &project, &key.wallet)
    }

    /// Fetch the on-chain stake for `key` and make the cache match it.
    ///
    /// An absent account or a zero amount means "no stake" and deletes
    /// any cached row (deleting a missing row is still success). Any
    /// live stake is upserted with the decoded amount and address.
    pub async fn sync_one(&self, key: StakeKey) -> SyncResult<SyncOutcome> {
        let stake_pda = self.stake_address(&key);

        match self.chain.get_account(&stake_pda).await? {
            Some(bytes) => {
                let stake = decode_user_stake(&bytes)?;
                if stake.amount == 0 {
                    debug!(wallet = %key.wallet, pool = %key.pool(), "on-chain stake is zero, removing cache row");
                    self.store.delete_stake(&key).await?;
                    return Ok(SyncOutcome::deleted());
                }

                self.store
                    .upsert_stake(&StakeRow {
                        wallet: key.wallet,
                        mint: key.mint,
                        pool_id: key.pool_id,
                        amount: stake.amount,
                        rewards_pending: stake.rewards_pending,
                        stake_pda,
                        updated_at: Utc::now(),
                    })
                    .await?;
                Ok(SyncOutcome::upserted(stake.amount))
            }
            None => {
                debug!(wallet = %key.wallet, pool = %key.pool(), "no on-chain stake account, removing cache row");
                self.store.delete_stake(&key).await?;
                Ok(SyncOutcome::deleted())
            }
        }
    }

    /// Verified write path for a client claiming to have staked.
    ///
    /// The claimed amount is advisory only: the account is fetched and
    /// decoded independently, ownership is checked against the caller's
    /// wallet, and only the decoded on-chain amount is persisted.
    /// Returns the amount actually written.
    pub async fn verify_and_upsert(&self, key: StakeKey, claimed_amount: u64) -> SyncResult<u64> {
        let stake_pda = self.stake_address(&key);

        let bytes = self
            .chain
            .get_account(&stake_pda)
            .await?
            .ok_or_else(|| SyncError::AccountNotFound {
                address: stake_pda.to_string(),
            })?;
        let stake = decode_user_stake(&bytes)?;

        if stake.owner != key.wallet {
            return Err(SyncError::OwnershipMismatch {
                claimed: key.wallet.to_string(),
                found: stake.owner.to_string(),
            });
        }

        if stake.amount != claimed_amount {
            warn!(
                wallet = %key.wallet,
                pool = %key.pool(),
                claimed = claimed_amount,
                on_chain = stake.amount,
                "client-claimed amount differs from chain, persisting chain value"
            );
        }

        if stake.amount == 0 {
            self.store.delete_stake(&key).await?;
            return Ok(0);
        }

        self.store
            .upsert_stake(&StakeRow {
                wallet: key.wallet,
                mint: key.mint,
                pool_id: key.pool_id,
                amount: stake.amount,
                rewards_pending: stake.rewards_pending,
                stake_pda,
                updated_at: Utc::now(),
            })
            .await?;
        Ok(stake.amount)
    }
}
