//! Asset symbols and their static per-network configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownSymbol;

// =============================================================================
// Native tokens
// =============================================================================

/// Native token of a relay-chain network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NativeToken {
    Dot,
    Ksm,
    Wnd,
    Pas,
}

impl NativeToken {
    pub const ALL: [NativeToken; 4] = [Self::Dot, Self::Ksm, Self::Wnd, Self::Pas];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Dot => "DOT",
            Self::Ksm => "KSM",
            Self::Wnd => "WND",
            Self::Pas => "PAS",
        }
    }

    /// Name of the relay-chain network this token is native to.
    pub fn network(&self) -> &'static str {
        match self {
            Self::Dot => "Polkadot",
            Self::Ksm => "Kusama",
            Self::Wnd => "Westend",
            Self::Pas => "Paseo",
        }
    }

    /// Number of fractional digits of one token (planck scale).
    pub fn decimals(&self) -> u32 {
        match self {
            Self::Dot | Self::Pas => 10,
            Self::Ksm | Self::Wnd => 12,
        }
    }

    /// Maximum number of validators a nominator may target.
    pub fn max_nominations(&self) -> usize {
        match self {
            Self::Ksm => 24,
            Self::Dot | Self::Wnd | Self::Pas => 16,
        }
    }

    /// Minimum bond for joining a nomination pool, in whole tokens.
    pub fn min_pool_bond(&self) -> &'static str {
        match self {
            Self::Ksm => "0.01",
            Self::Dot | Self::Wnd | Self::Pas => "1",
        }
    }

    /// Staking unbonding period in days.
    pub fn unbonding_period_days(&self) -> u32 {
        match self {
            Self::Dot => 28,
            Self::Ksm => 7,
            Self::Wnd | Self::Pas => 2,
        }
    }

    /// Look up a token by its network name ("Polkadot", "westend", ...).
    pub fn for_network(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.network().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for NativeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for NativeToken {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

// =============================================================================
// Stablecoins
// =============================================================================

/// Stablecoin living on the Polkadot asset hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Stablecoin {
    Usdt,
    Usdc,
}

impl Stablecoin {
    pub const ALL: [Stablecoin; 2] = [Self::Usdt, Self::Usdc];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usdt => "USDT",
            Self::Usdc => "USDC",
        }
    }

    pub fn decimals(&self) -> u32 {
        6
    }

    /// Asset class identifier in the asset hub `Assets` pallet.
    pub fn asset_id(&self) -> u32 {
        match self {
            Self::Usdt => 1984,
            Self::Usdc => 1337,
        }
    }

    /// Network whose asset hub issues the stablecoin.
    pub fn home_network(&self) -> NativeToken {
        NativeToken::Dot
    }
}

impl std::fmt::Display for Stablecoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Stablecoin {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSymbol(s.to_string()))
    }
}

// =============================================================================
// Asset symbol
// =============================================================================

/// Any asset the core can route: a native token or a stablecoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssetSymbol {
    Native(NativeToken),
    Stablecoin(Stablecoin),
}

impl AssetSymbol {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Native(t) => t.symbol(),
            Self::Stablecoin(s) => s.symbol(),
        }
    }

    pub fn decimals(&self) -> u32 {
        match self {
            Self::Native(t) => t.decimals(),
            Self::Stablecoin(s) => s.decimals(),
        }
    }
}

impl std::fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for AssetSymbol {
    type Err = UnknownSymbol;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NativeToken::from_str(s)
            .map(Self::Native)
            .or_else(|_| Stablecoin::from_str(s).map(Self::Stablecoin))
    }
}

impl From<NativeToken> for AssetSymbol {
    fn from(token: NativeToken) -> Self {
        Self::Native(token)
    }
}

impl From<Stablecoin> for AssetSymbol {
    fn from(coin: Stablecoin) -> Self {
        Self::Stablecoin(coin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_parsing_is_case_insensitive() {
        assert_eq!("dot".parse::<NativeToken>().unwrap(), NativeToken::Dot);
        assert_eq!(" Wnd ".parse::<NativeToken>().unwrap(), NativeToken::Wnd);
        assert_eq!(
            "usdc".parse::<AssetSymbol>().unwrap(),
            AssetSymbol::Stablecoin(Stablecoin::Usdc)
        );
        assert!("ETH".parse::<AssetSymbol>().is_err());
    }

    // Test critique: les symboles natifs et stablecoins ne se mélangent pas
    #[test]
    fn test_native_parser_rejects_stablecoins() {
        assert!("USDT".parse::<NativeToken>().is_err());
        assert!("DOT".parse::<Stablecoin>().is_err());
    }

    #[test]
    fn test_network_tables() {
        assert_eq!(NativeToken::Dot.decimals(), 10);
        assert_eq!(NativeToken::Wnd.decimals(), 12);
        assert_eq!(NativeToken::Dot.max_nominations(), 16);
        assert_eq!(NativeToken::Ksm.max_nominations(), 24);
        assert_eq!(NativeToken::for_network("paseo"), Some(NativeToken::Pas));
        assert_eq!(NativeToken::for_network("Rococo"), None);
        assert_eq!(Stablecoin::Usdt.asset_id(), 1984);
    }

    #[test]
    fn test_asset_symbol_serializes_as_plain_symbol() {
        let json = serde_json::to_value(AssetSymbol::Native(NativeToken::Pas)).unwrap();
        assert_eq!(json, serde_json::json!("PAS"));
        let json = serde_json::to_value(AssetSymbol::Stablecoin(Stablecoin::Usdt)).unwrap();
        assert_eq!(json, serde_json::json!("USDT"));
    }
}
