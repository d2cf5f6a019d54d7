//! PostgreSQL-backed stake cache with runtime queries (no compile-time checking)
//!
//! Raw token amounts are stored as NUMERIC: they can exceed the BIGINT
//! range for 9-decimal tokens with large supplies.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::config::DatabaseConfig;
use crate::core::error::{SyncError, SyncResult};
use crate::core::traits::StakeStore;
use crate::core::types::{PoolRow, StakeKey, StakeRow};

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(config: &DatabaseConfig) -> SyncResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.postgres_url)
            .await?;

        Ok(Self { pool })
    }

    /// Apply schema migrations
    pub async fn migrate(&self) -> SyncResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn parse_pubkey(value: &str, column: &str) -> SyncResult<Pubkey> {
        Pubkey::from_str(value)
            .map_err(|e| SyncError::Storage(format!("invalid pubkey in column {column}: {e}")))
    }

    fn decimal_to_u64(value: Decimal, column: &str) -> SyncResult<u64> {
        value
            .to_u64()
            .ok_or_else(|| SyncError::Storage(format!("value out of range in column {column}")))
    }

    fn stake_row_from(row: &sqlx::postgres::PgRow) -> SyncResult<StakeRow> {
        Ok(StakeRow {
            wallet: Self::parse_pubkey(&row.get::<String, _>("wallet"), "wallet")?,
            mint: Self::parse_pubkey(&row.get::<String, _>("mint"), "mint")?,
            pool_id: row.get::<i32, _>("pool_id") as u16,
            amount: Self::decimal_to_u64(row.get("amount"), "amount")?,
            rewards_pending: Self::decimal_to_u64(row.get("rewards_pending"), "rewards_pending")?,
            stake_pda: Self::parse_pubkey(&row.get::<String, _>("stake_pda"), "stake_pda")?,
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl StakeStore for PostgresStore {
    async fn upsert_stake(&self, row: &StakeRow) -> SyncResult<()> {
        let query = r#"
            INSERT INTO user_stakes (
                wallet, mint, pool_id, amount, rewards_pending, stake_pda, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (wallet, mint, pool_id) DO UPDATE SET
                amount = EXCLUDED.amount,
                rewards_pending = EXCLUDED.rewards_pending,
                stake_pda = EXCLUDED.stake_pda,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(row.wallet.to_string())
            .bind(row.mint.to_string())
            .bind(row.pool_id as i32)
            .bind(Decimal::from(row.amount))
            .bind(Decimal::from(row.rewards_pending))
            .bind(row.stake_pda.to_string())
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_stake(&self, key: &StakeKey) -> SyncResult<Option<StakeRow>> {
        let query = "SELECT * FROM user_stakes WHERE wallet = $1 AND mint = $2 AND pool_id = $3";

        let result = sqlx::query(query)
            .bind(key.wallet.to_string())
            .bind(key.mint.to_string())
            .bind(key.pool_id as i32)
            .fetch_optional(&self.pool)
            .await?;

        match result {
            Some(row) => Ok(Some(Self::stake_row_from(&row)?)),
            None => Ok(None),
        }
    }

    async fn delete_stake(&self, key: &StakeKey) -> SyncResult<bool> {
        let query = "DELETE FROM user_stakes WHERE wallet = $1 AND mint = $2 AND pool_id = $3";

        let result = sqlx::query(query)
            .bind(key.wallet.to_string())
            .bind(key.mint.to_string())
            .bind(key.pool_id as i32)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_stake_by_pda(&self, stake_pda: &Pubkey) -> SyncResult<bool> {
        let query = "DELETE FROM user_stakes WHERE stake_pda = $1";

        let result = sqlx::query(query)
            .bind(stake_pda.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_stakes(&self) -> SyncResult<Vec<StakeRow>> {
        let rows = sqlx::query("SELECT * FROM user_stakes")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::stake_row_from).collect()
    }

    async fn upsert_pool(&self, row: &PoolRow) -> SyncResult<()> {
        let query = r#"
            INSERT INTO pools (mint, pool_id, decimals, total_staked, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (mint, pool_id) DO UPDATE SET
                decimals = EXCLUDED.decimals,
                total_staked = EXCLUDED.total_staked,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(row.mint.to_string())
            .bind(row.pool_id as i32)
            .bind(row.decimals as i16)
            .bind(Decimal::from(row.total_staked))
            .bind(row.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_pools(&self) -> SyncResult<Vec<PoolRow>> {
        let rows = sqlx::query("SELECT * FROM pools")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                Ok(PoolRow {
                    mint: Self::parse_pubkey(&row.get::<String, _>("mint"), "mint")?,
                    pool_id: row.get::<i32, _>("pool_id") as u16,
                    decimals: row.get::<i16, _>("decimals") as u8,
                    total_staked: Self::decimal_to_u64(row.get("total_staked"), "total_staked")?,
                    updated_at: row.get("updated_at"),
                })
            })
            .collect()
    }
}
