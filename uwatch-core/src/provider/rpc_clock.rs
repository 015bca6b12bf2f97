//! Solana JSON-RPC chain clock.
//!
//! Builds an [`EligibilityContext`] from `getEpochInfo` plus two
//! `getBlockTime` calls (current slot and first slot of the epoch). A node
//! that cannot produce a block time yields `None` for that timestamp
//! rather than failing the cycle; the evaluator fails closed on it.

use super::{ChainClock, ProviderError};
use crate::tickets::eligibility::EligibilityContext;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EpochInfo {
    epoch: u64,
    absolute_slot: u64,
    slot_index: u64,
}

/// Chain clock backed by a Solana JSON-RPC node.
pub struct RpcChainClock {
    rpc_url: Url,
    http_client: reqwest::Client,
}

impl RpcChainClock {
    pub fn new(rpc_url: Url, http_client: reqwest::Client) -> Self {
        Self {
            rpc_url,
            http_client,
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<Option<T>, ProviderError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http_client
            .post(self.rpc_url.clone())
            .json(&body)
            .send()
            .await?;
        let response: RpcResponse<T> = response.json().await?;

        if let Some(err) = response.error {
            return Err(ProviderError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result)
    }

    /// `getBlockTime` answers null or a slot-unavailable error for slots
    /// outside the node's retention window; both map to `None`.
    async fn block_time(&self, slot: u64) -> Result<Option<i64>, ProviderError> {
        match self.call::<i64>("getBlockTime", json!([slot])).await {
            Ok(timestamp) => Ok(timestamp),
            Err(ProviderError::Rpc { code, message })
                if matches!(code, -32004 | -32007 | -32009) =>
            {
                debug!(slot, code, message = %message, "Block time unavailable");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ChainClock for RpcChainClock {
    async fn snapshot(&self) -> Result<EligibilityContext, ProviderError> {
        let info: EpochInfo = self
            .call("getEpochInfo", json!([]))
            .await?
            .ok_or_else(|| ProviderError::Decode("getEpochInfo returned no result".to_string()))?;

        let first_slot_of_epoch = info.absolute_slot.saturating_sub(info.slot_index);
        let current_slot_timestamp = self.block_time(info.absolute_slot).await?;
        let first_slot_timestamp = self.block_time(first_slot_of_epoch).await?;

        debug!(
            epoch = info.epoch,
            slot = info.absolute_slot,
            first_slot_of_epoch,
            "Chain clock snapshot taken"
        );

        Ok(EligibilityContext {
            current_epoch: info.epoch,
            current_slot: info.absolute_slot,
            first_slot_of_epoch,
            current_slot_timestamp,
            first_slot_timestamp,
        })
    }
}
