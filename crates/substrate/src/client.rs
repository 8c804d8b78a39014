//! Per-chain Substrate RPC client.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use subxt::backend::chain_head::{ChainHeadBackend, ChainHeadBackendBuilder};
use subxt::backend::legacy::LegacyRpcMethods;
use subxt::backend::rpc::RpcClient;
use subxt::dynamic::Value;
use subxt::{OnlineClient, PolkadotConfig};
use tracing::{debug, instrument, trace};

use ferry_core::error::{ChainError, ChainResult};

use crate::config::ChainEndpoint;

/// Pallets through which a runtime can send XCM messages.
pub const XCM_PALLETS: [&str; 2] = ["PolkadotXcm", "XcmPallet"];

/// Live connection to one chain.
pub struct ChainClient {
    chain: String,
    client: OnlineClient<PolkadotConfig>,
    rpc: LegacyRpcMethods<PolkadotConfig>,
}

impl ChainClient {
    /// Connect to a chain's node.
    #[instrument(skip_all, fields(chain = %endpoint.chain, url = %endpoint.url))]
    pub async fn connect(endpoint: &ChainEndpoint) -> ChainResult<Self> {
        debug!("Connecting to node");

        let rpc_client = RpcClient::from_url(endpoint.url.as_str())
            .await
            .map_err(|e| ChainError::ConnectionFailed(format!("{}: {e}", endpoint.chain)))?;
        let backend: ChainHeadBackend<PolkadotConfig> =
            ChainHeadBackendBuilder::default().build_with_background_driver(rpc_client.clone());
        let client = OnlineClient::<PolkadotConfig>::from_backend(Arc::new(backend))
            .await
            .map_err(|e| ChainError::ConnectionFailed(format!("{}: {e}", endpoint.chain)))?;

        debug!("Connected successfully");

        Ok(Self {
            chain: endpoint.chain.clone(),
            client,
            rpc: LegacyRpcMethods::new(rpc_client),
        })
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Native token symbols from `system_properties`.
    pub async fn token_symbols(&self) -> ChainResult<Vec<String>> {
        let properties = self
            .rpc
            .system_properties()
            .await
            .map_err(|e| ChainError::RpcError(format!("{}: {e}", self.chain)))?;
        let symbols = token_symbols(properties.get("tokenSymbol"));
        trace!(chain = %self.chain, ?symbols, "Fetched token symbols");
        Ok(symbols)
    }

    pub fn has_pallet(&self, pallet: &str) -> bool {
        self.client.metadata().pallet_by_name(pallet).is_some()
    }

    /// Whether the runtime exposes an XCM sending pallet.
    pub fn has_xcm_pallet(&self) -> bool {
        XCM_PALLETS.iter().any(|pallet| self.has_pallet(pallet))
    }

    /// Whether `Assets.Asset(id)` exists at the latest block.
    ///
    /// Runtimes without an `Assets` pallet hold no such asset.
    pub async fn asset_exists(&self, asset_id: u32) -> ChainResult<bool> {
        if !self.has_pallet("Assets") {
            return Ok(false);
        }

        let address = subxt::dynamic::storage("Assets", "Asset", vec![Value::u128(u128::from(asset_id))]);
        let storage = self
            .client
            .storage()
            .at_latest()
            .await
            .map_err(|e| ChainError::RpcError(format!("{}: {e}", self.chain)))?;
        let entry = storage
            .fetch(&address)
            .await
            .map_err(|e| ChainError::RpcError(format!("{}: {e}", self.chain)))?;

        Ok(entry.is_some())
    }
}

/// Normalize the `tokenSymbol` property, which is a string on single-token
/// chains and an array on multi-token ones.
pub fn token_symbols(property: Option<&JsonValue>) -> Vec<String> {
    match property {
        Some(JsonValue::String(symbol)) => vec![symbol.clone()],
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
