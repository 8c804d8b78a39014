//! Substrate RPC adapter for Ferry.
//!
//! This crate implements the [`CapabilityOracle`] port from `ferry-core`,
//! asking live Substrate chains over WebSocket RPC whether an asset can
//! actually move on a route.
//!
//! # Checks
//!
//! - Native tokens: the chain's `system_properties.tokenSymbol`, or a
//!   foreign-asset registry pallet (`ForeignAssets`, `AssetRegistry`, ...)
//! - Stablecoins: existence of the `Assets.Asset(id)` storage entry
//! - Routes: both runtimes expose `PolkadotXcm` or `XcmPallet`
//!
//! # Usage
//!
//! ```ignore
//! use ferry_substrate::{SubstrateCapabilityOracle, SubstrateOracleConfig};
//!
//! let config = SubstrateOracleConfig::from_list(
//!     "Polkadot=wss://rpc.polkadot.io,AssetHubPolkadot=wss://polkadot-asset-hub-rpc.polkadot.io",
//! )?;
//! let oracle = SubstrateCapabilityOracle::connect(&config).await?;
//! let resolver = RouteResolver::new(topology).with_oracle(Arc::new(oracle));
//! ```
//!
//! [`CapabilityOracle`]: ferry_core::ports::CapabilityOracle

mod client;
mod config;
mod oracle;

pub use client::{ChainClient, XCM_PALLETS, token_symbols};
pub use config::{ChainEndpoint, SubstrateOracleConfig, parse_endpoints};
pub use oracle::{FOREIGN_ASSET_PALLETS, SubstrateCapabilityOracle, native_token_supported};
