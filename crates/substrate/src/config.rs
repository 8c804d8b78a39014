//! Endpoint configuration for the capability oracle.

use url::Url;

use ferry_core::error::{ChainError, ChainResult};

/// One chain the oracle can query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoint {
    /// Canonical chain id (e.g., "AssetHubPolkadot").
    pub chain: String,
    pub url: Url,
}

/// Configuration for the Substrate capability oracle.
#[derive(Debug, Clone, Default)]
pub struct SubstrateOracleConfig {
    pub endpoints: Vec<ChainEndpoint>,
}

impl SubstrateOracleConfig {
    /// Build from a `Chain=wss://url,Other=ws://url` list.
    pub fn from_list(list: &str) -> ChainResult<Self> {
        Ok(Self {
            endpoints: parse_endpoints(list)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

/// Parse a comma-separated `Chain=url` list. Blank entries are skipped.
pub fn parse_endpoints(list: &str) -> ChainResult<Vec<ChainEndpoint>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_endpoint)
        .collect()
}

fn parse_endpoint(entry: &str) -> ChainResult<ChainEndpoint> {
    let (chain, raw_url) = entry
        .split_once('=')
        .ok_or_else(|| ChainError::InvalidEndpoint(format!("expected Chain=url, got `{entry}`")))?;

    let chain = chain.trim();
    if chain.is_empty() {
        return Err(ChainError::InvalidEndpoint(format!("missing chain name in `{entry}`")));
    }

    let url = Url::parse(raw_url.trim())
        .map_err(|e| ChainError::InvalidEndpoint(format!("{chain}: {e}")))?;
    if !matches!(url.scheme(), "ws" | "wss") {
        return Err(ChainError::InvalidEndpoint(format!(
            "{chain}: expected a ws:// or wss:// url, got {}",
            url.scheme()
        )));
    }

    Ok(ChainEndpoint {
        chain: chain.to_string(),
        url,
    })
}
