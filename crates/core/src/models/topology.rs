//! Chain topology registry.
//!
//! Static, read-only mapping of relay chains to the system chains and
//! parachains reachable with their native token. Display names come from
//! users or the UI and are matched case- and whitespace-insensitively;
//! canonical identifiers are what the execution layer understands.

use std::borrow::Cow;

use serde::Serialize;

use crate::error::TopologyError;
use crate::models::{AddressScheme, NativeToken};

/// Normalized display name of the generic asset hub.
const HUB_SUFFIX: &str = "assethub";

/// Symbol-agnostic asset hub display name.
pub const GENERIC_HUB: &str = "AssetHub";

/// Canonical chain stablecoins are sent from.
pub const STABLECOIN_SOURCE_CHAIN: &str = "AssetHubPolkadot";

/// Canonical stablecoin destinations and the address scheme of their accounts.
pub const STABLECOIN_DESTINATIONS: [(&str, AddressScheme); 2] = [
    ("Hydration", AddressScheme::Ss58),
    ("Moonbeam", AddressScheme::Ethereum),
];

/// Lowercase and strip every whitespace character.
pub fn normalize_chain_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn same_name(a: &str, b: &str) -> bool {
    normalize_chain_name(a) == normalize_chain_name(b)
}

// =============================================================================
// Types
// =============================================================================

/// One reachable chain: the name users type and the id the executor uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    pub display_name: String,
    pub canonical_id: String,
}

impl ChainEntry {
    pub fn new(display_name: impl Into<String>, canonical_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            canonical_id: canonical_id.into(),
        }
    }
}

/// A relay chain with the chains its native token can be teleported to.
///
/// `chains` includes a self-entry for the relay itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayNetwork {
    pub symbol: NativeToken,
    pub relay: String,
    pub chains: Vec<ChainEntry>,
}

impl RelayNetwork {
    /// Build from a static `(display, canonical)` table, adding the relay self-entry.
    pub fn from_table(symbol: NativeToken, relay: &str, table: &[(&str, &str)]) -> Self {
        let chains = std::iter::once(ChainEntry::new(relay, relay))
            .chain(table.iter().map(|(display, canonical)| ChainEntry::new(*display, *canonical)))
            .collect();
        Self {
            symbol,
            relay: relay.to_string(),
            chains,
        }
    }

    /// Every entry except the relay self-entry.
    pub fn parachains(&self) -> impl Iterator<Item = &ChainEntry> {
        self.chains
            .iter()
            .filter(move |entry| entry.canonical_id != self.relay)
    }

    // Canonical ids are accepted too, still within this table only.
    fn find_parachain(&self, name: &str) -> Option<&ChainEntry> {
        let wanted = normalize_chain_name(name);
        self.parachains().find(|entry| {
            normalize_chain_name(&entry.display_name) == wanted
                || normalize_chain_name(&entry.canonical_id) == wanted
        })
    }
}

/// Process-wide topology, never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTopology {
    networks: Vec<RelayNetwork>,
}

impl Default for ChainTopology {
    fn default() -> Self {
        Self::new(vec![
            RelayNetwork::from_table(NativeToken::Dot, "Polkadot", POLKADOT_CHAINS),
            RelayNetwork::from_table(NativeToken::Wnd, "Westend", WESTEND_CHAINS),
            RelayNetwork::from_table(NativeToken::Pas, "Paseo", PASEO_CHAINS),
        ])
    }
}

impl ChainTopology {
    pub fn new(networks: Vec<RelayNetwork>) -> Self {
        Self { networks }
    }

    pub fn networks(&self) -> &[RelayNetwork] {
        &self.networks
    }

    /// Relay chain names, in declaration order.
    pub fn relay_chains(&self) -> Vec<&str> {
        self.networks.iter().map(|n| n.relay.as_str()).collect()
    }

    pub fn network(&self, symbol: NativeToken) -> Option<&RelayNetwork> {
        self.networks.iter().find(|n| n.symbol == symbol)
    }

    /// Relay chain the token is native to, if it has a routing table.
    pub fn relay_of(&self, symbol: NativeToken) -> Option<&str> {
        self.network(symbol).map(|n| n.relay.as_str())
    }

    pub fn is_relay_chain(&self, name: &str) -> bool {
        self.networks.iter().any(|n| same_name(&n.relay, name))
    }

    /// Parachain entry for `name` under the token's table (relay excluded).
    pub fn find_parachain(&self, name: &str, symbol: NativeToken) -> Option<&ChainEntry> {
        self.network(symbol)?.find_parachain(name)
    }

    /// Whether `name` is a parachain under any table other than `symbol`'s.
    pub fn is_parachain_elsewhere(&self, name: &str, symbol: NativeToken) -> bool {
        self.networks
            .iter()
            .filter(|n| n.symbol != symbol)
            .any(|n| n.find_parachain(name).is_some())
    }

    /// Rewrite "<Relay> Asset Hub" to the generic hub name.
    ///
    /// The relay prefix must match the token's relay; names without a known
    /// relay prefix are returned unchanged.
    pub fn normalize_hub_alias<'a>(
        &self,
        name: &'a str,
        symbol: NativeToken,
    ) -> Result<Cow<'a, str>, TopologyError> {
        let normalized = normalize_chain_name(name);
        let Some(prefix) = normalized.strip_suffix(HUB_SUFFIX) else {
            return Ok(Cow::Borrowed(name));
        };
        if prefix.is_empty() || !self.is_network_prefix(prefix) {
            return Ok(Cow::Borrowed(name));
        }

        let expected = self.relay_of(symbol).unwrap_or(symbol.network());
        if normalize_chain_name(expected) == prefix {
            Ok(Cow::Borrowed(GENERIC_HUB))
        } else {
            Err(TopologyError::CrossEcosystemMismatch {
                chain: name.to_string(),
                expected_relay: expected.to_string(),
            })
        }
    }

    /// Resolve a display name to its canonical id under the token's table.
    ///
    /// The token's own relay resolves to itself.
    pub fn resolve_canonical(&self, name: &str, symbol: NativeToken) -> Result<&str, TopologyError> {
        let name = self.normalize_hub_alias(name, symbol)?;
        let network = self
            .network(symbol)
            .ok_or_else(|| TopologyError::NotFound(name.to_string()))?;

        if same_name(&network.relay, &name) {
            return Ok(network.relay.as_str());
        }

        network
            .find_parachain(&name)
            .map(|entry| entry.canonical_id.as_str())
            .ok_or_else(|| TopologyError::NotFound(name.to_string()))
    }

    fn is_network_prefix(&self, prefix: &str) -> bool {
        self.networks
            .iter()
            .map(|n| n.relay.as_str())
            .chain(NativeToken::ALL.iter().map(|t| t.network()))
            .any(|relay| normalize_chain_name(relay) == prefix)
    }
}

// =============================================================================
// Static tables (display name → canonical id)
// =============================================================================

const POLKADOT_CHAINS: &[(&str, &str)] = &[
    ("AssetHub", "AssetHubPolkadot"),
    ("Acala", "Acala"),
    ("Ajuna", "Ajuna"),
    ("Astar", "Astar"),
    ("Bifrost", "BifrostPolkadot"),
    ("BridgeHub", "BridgeHubPolkadot"),
    ("Centrifuge", "Centrifuge"),
    ("ComposableFinance", "ComposableFinance"),
    ("Darwinia", "Darwinia"),
    ("Hydration", "Hydration"),
    ("Interlay", "Interlay"),
    ("Heima", "Heima"),
    ("Jamton", "Jamton"),
    ("Moonbeam", "Moonbeam"),
    ("Coretime", "CoretimePolkadot"),
    ("Laos", "Laos"),
    ("Robonomics", "RobonomicsPolkadot"),
    ("People", "PeoplePolkadot"),
    ("Unique", "Unique"),
    ("Crust", "Crust"),
    ("Manta", "Manta"),
    ("Nodle", "Nodle"),
    ("NeuroWeb", "NeuroWeb"),
    ("Pendulum", "Pendulum"),
    ("Zeitgeist", "Zeitgeist"),
    ("Collectives", "Collectives"),
    ("Phala", "Phala"),
    ("Subsocial", "Subsocial"),
    ("KiltSpiritnet", "KiltSpiritnet"),
    ("Curio", "Curio"),
    ("Mythos", "Mythos"),
    ("Peaq", "Peaq"),
    ("Polimec", "Polimec"),
];

const WESTEND_CHAINS: &[(&str, &str)] = &[
    ("AssetHub", "AssetHubWestend"),
    ("BridgeHub", "BridgeHubWestend"),
    ("Collectives", "CollectivesWestend"),
    ("Coretime", "CoretimeWestend"),
    ("People", "PeopleWestend"),
    ("Penpal", "Penpal"),
];

const PASEO_CHAINS: &[(&str, &str)] = &[
    ("AssetHub", "AssetHubPaseo"),
    ("BridgeHub", "BridgeHubPaseo"),
    ("Coretime", "CoretimePaseo"),
    ("PAssetHub", "PAssetHub"),
    ("People", "PeoplePaseo"),
    ("Ajuna", "AjunaPaseo"),
    ("Bifrost", "BifrostPaseo"),
    ("Heima", "HeimaPaseo"),
    ("Hydration", "HydrationPaseo"),
    ("Kilt", "KiltPaseo"),
    ("Laos", "LaosPaseo"),
    ("NeuroWeb", "NeuroWebPaseo"),
    ("Nodle", "NodlePaseo"),
    ("Zeitgeist", "ZeitgeistPaseo"),
];
