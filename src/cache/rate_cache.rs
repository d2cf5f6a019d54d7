//! Short-TTL memoization of pool display rates
//!
//! Sits in front of the on-chain project fetch on the pool-listing read
//! path. Purely a performance layer: a miss or expired entry always
//! re-derives from a fresh chain read, and all misses for one request
//! are batched into a single multi-account fetch.
//!
//! The map lives behind a plain mutex that is never held across an
//! await. Concurrent refreshes of the same key are last-writer-wins;
//! both writers derive the same value from the same chain state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use solana_sdk::pubkey::Pubkey;
use tracing::warn;

use crate::chain::accounts::decode_project;
use crate::chain::pda::derive_project_address;
use crate::core::error::{SyncError, SyncResult};
use crate::core::traits::ChainReader;
use crate::core::types::PoolKey;
use crate::rewards::rate::{pool_rate, PoolRate};

pub const DEFAULT_RATE_TTL_SECS: i64 = 30;

/// Time source, injectable for tests
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: PoolRate,
    cached_at: i64,
}

/// TTL-bounded rate cache in front of the on-chain project fetch
pub struct RateCache {
    chain: Arc<dyn ChainReader>,
    program_id: Pubkey,
    ttl_secs: i64,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<PoolKey, CachedRate>>,
}

impl RateCache {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        program_id: Pubkey,
        ttl_secs: i64,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            chain,
            program_id,
            ttl_secs,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Display rates for `keys`, serving unexpired entries from memory.
    ///
    /// All misses are fetched in one `getMultipleAccounts` round trip.
    /// Pools that are absent on chain or fail to decode are omitted
    /// from the result (and logged); they never produce a stale entry.
    pub async fn get_rates(&self, keys: &[PoolKey]) -> SyncResult<HashMap<PoolKey, PoolRate>> {
        let now = self.clock.now_unix();

        let mut rates = HashMap::with_capacity(keys.len());
        let mut misses: Vec<PoolKey> = Vec::new();
        {
            let entries = self.entries.lock().expect("rate cache lock poisoned");
            for key in keys {
                match entries.get(key) {
                    Some(entry) if now - entry.cached_at < self.ttl_secs => {
                        rates.insert(*key, entry.rate);
                    }
                    _ => {
                        if !misses.contains(key) {
                            misses.push(*key);
                        }
                    }
                }
            }
        }

        if misses.is_empty() {
            return Ok(rates);
        }

        // One round trip for every miss in this request
        let addresses: Vec<Pubkey> = misses
            .iter()
            .map(|key| derive_project_address(&self.program_id, &key.mint, key.pool_id))
            .collect();
        let fetched = self.chain.get_multiple_accounts(&addresses).await?;

        let mut entries = self.entries.lock().expect("rate cache lock poisoned");
        for (key, data) in misses.iter().zip(fetched) {
            let Some(bytes) = data else {
                warn!(pool = %key, "pool account not found on chain, skipping rate");
                continue;
            };
            let project = match decode_project(&bytes) {
                Ok(project) => project,
                Err(e) => {
                    warn!(pool = %key, error = %e, "failed to decode pool account, skipping rate");
                    continue;
                }
            };
            let rate = pool_rate(&project);
            entries.insert(
                *key,
                CachedRate {
                    rate,
                    cached_at: now,
                },
            );
            rates.insert(*key, rate);
        }

        Ok(rates)
    }

    /// Display rate for a single pool
    pub async fn get_rate(&self, key: PoolKey) -> SyncResult<PoolRate> {
        let mut rates = self.get_rates(&[key]).await?;
        rates.remove(&key).ok_or_else(|| SyncError::AccountNotFound {
            address: derive_project_address(&self.program_id, &key.mint, key.pool_id).to_string(),
        })
    }

    /// Drop a cached entry, forcing the next read to hit the chain
    pub fn invalidate(&self, key: &PoolKey) {
        self.entries
            .lock()
            .expect("rate cache lock poisoned")
            .remove(key);
    }
}
