//! Port trait for the asset-support oracle.
//!
//! Static topology rules are necessary but not sufficient: real asset support
//! can lag the tables. Implementations query live chains (e.g.,
//! `ferry-substrate`) and report whether an asset actually moves on a route.

use async_trait::async_trait;

use crate::error::ChainResult;
use crate::models::AssetSymbol;

/// Live asset-support queries, keyed by canonical chain identifier.
///
/// An `Err` means the oracle could not answer. Callers must treat it as a
/// rejection, never as a pass.
#[async_trait]
pub trait CapabilityOracle: Send + Sync {
    /// Does `chain` know about `symbol` at all?
    async fn supports_asset(&self, chain: &str, symbol: AssetSymbol) -> ChainResult<bool>;

    /// Can `symbol` be sent from `src` to `dst` over XCM?
    ///
    /// Asked after `supports_asset` succeeded for both ends.
    async fn asset_supported_on_route(
        &self,
        symbol: AssetSymbol,
        src: &str,
        dst: &str,
    ) -> ChainResult<bool>;
}
