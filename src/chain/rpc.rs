//! Lightweight Solana RPC reader
//!
//! A minimal JSON-RPC client implementing only the read methods the
//! reconcilers need, avoiding the heavy dependency chain of
//! solana-client. All failures (transport, timeout, malformed response)
//! map to `SyncError::Transient`: a failed read is never interpreted as
//! "account does not exist".

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::core::error::{SyncError, SyncResult};
use crate::core::traits::ChainReader;

/// Lightweight RPC reader for the staking program
pub struct RpcReader {
    url: String,
    program_id: Pubkey,
    commitment: String,
    agent: ureq::Agent,
}

/// RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Account data as returned by account-info style methods
#[derive(Debug, Deserialize)]
struct AccountInfo {
    data: (String, String), // (data, encoding)
}

/// Keyed account from getProgramAccounts
#[derive(Debug, Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: AccountInfo,
}

impl RpcReader {
    pub fn new(
        url: String,
        program_id: Pubkey,
        commitment: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(connect_timeout)
            .timeout_read(request_timeout)
            .build();

        Self {
            url,
            program_id,
            commitment,
            agent,
        }
    }

    /// Make a JSON-RPC call
    async fn call<T>(&self, method: &str, params: Value) -> SyncResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let request_body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params
        });

        debug!("RPC call: {}", method);

        // ureq is sync, so run the request on the blocking pool
        let response_body = tokio::task::spawn_blocking({
            let agent = self.agent.clone();
            let url = self.url.clone();
            let body = request_body.to_string();

            move || {
                let response = agent
                    .post(&url)
                    .set("Content-Type", "application/json")
                    .send_string(&body)?;

                let text = response.into_string()?;
                Ok::<String, ureq::Error>(text)
            }
        })
        .await
        .map_err(|e| SyncError::Transient(format!("RPC task failed: {e}")))?
        .map_err(|e| SyncError::Transient(format!("RPC transport error: {e}")))?;

        let rpc_response: RpcResponse<T> = serde_json::from_str(&response_body)
            .map_err(|e| SyncError::Transient(format!("malformed RPC response: {e}")))?;

        if let Some(error) = rpc_response.error {
            return Err(SyncError::Transient(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        rpc_response
            .result
            .ok_or_else(|| SyncError::Transient("no result in RPC response".to_string()))
    }

    fn decode_account_data(info: &AccountInfo) -> SyncResult<Vec<u8>> {
        if info.data.1 != "base64" {
            return Err(SyncError::Transient(format!(
                "unsupported account encoding: {}",
                info.data.1
            )));
        }
        base64::engine::general_purpose::STANDARD
            .decode(&info.data.0)
            .map_err(|e| SyncError::Transient(format!("invalid base64 account data: {e}")))
    }
}

#[async_trait]
impl ChainReader for RpcReader {
    async fn get_account(&self, address: &Pubkey) -> SyncResult<Option<Vec<u8>>> {
        let params = json!([
            address.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment,
            }
        ]);

        let response: Value = self.call("getAccountInfo", params).await?;

        if response["value"].is_null() {
            return Ok(None);
        }

        let info: AccountInfo = serde_json::from_value(response["value"].clone())
            .map_err(|e| SyncError::Transient(format!("malformed account info: {e}")))?;

        Ok(Some(Self::decode_account_data(&info)?))
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> SyncResult<Vec<Option<Vec<u8>>>> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = addresses.iter().map(|a| a.to_string()).collect();
        let params = json!([
            keys,
            {
                "encoding": "base64",
                "commitment": self.commitment,
            }
        ]);

        let response: Value = self.call("getMultipleAccounts", params).await?;

        let values = response["value"]
            .as_array()
            .ok_or_else(|| SyncError::Transient("malformed getMultipleAccounts response".into()))?;

        let mut accounts = Vec::with_capacity(values.len());
        for value in values {
            if value.is_null() {
                accounts.push(None);
                continue;
            }
            let info: AccountInfo = serde_json::from_value(value.clone())
                .map_err(|e| SyncError::Transient(format!("malformed account info: {e}")))?;
            accounts.push(Some(Self::decode_account_data(&info)?));
        }

        Ok(accounts)
    }

    async fn get_program_accounts_memcmp(
        &self,
        offset: usize,
        bytes: &[u8],
    ) -> SyncResult<Vec<(Pubkey, Vec<u8>)>> {
        let params = json!([
            self.program_id.to_string(),
            {
                "encoding": "base64",
                "commitment": self.commitment,
                "filters": [
                    {
                        "memcmp": {
                            "offset": offset,
                            "bytes": bs58::encode(bytes).into_string(),
                        }
                    }
                ],
            }
        ]);

        let keyed: Vec<KeyedAccount> = self.call("getProgramAccounts", params).await?;

        let mut accounts = Vec::with_capacity(keyed.len());
        for entry in keyed {
            let pubkey: Pubkey = entry
                .pubkey
                .parse()
                .map_err(|e| SyncError::Transient(format!("invalid account pubkey: {e}")))?;
            accounts.push((pubkey, Self::decode_account_data(&entry.account)?));
        }

        Ok(accounts)
    }
}
