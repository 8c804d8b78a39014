//! Transfer route resolver.
//!
//! Classifies a (source, destination, asset) triple against the topology,
//! enforces teleport legality and emits a canonical [`TransactionDescriptor`].
//! Native-token routes are additionally gated by the capability oracle when
//! one is configured; an oracle failure rejects the route.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::error::{CapabilityFailure, ChainResult, DomainError, DomainResult, TopologyError};
use crate::metrics::record_capability_check;
use crate::models::{
    AddressField, AddressScheme, AssetSymbol, ChainTopology, NativeToken, Prepared, Route,
    RouteClassification, STABLECOIN_DESTINATIONS, STABLECOIN_SOURCE_CHAIN, StablecoinIntent,
    TransactionDescriptor, TransferIntent, normalize_chain_name,
};
use crate::ports::CapabilityOracle;

/// Resolves transfer intents into descriptors.
pub struct RouteResolver {
    topology: Arc<ChainTopology>,
    oracle: Option<Arc<dyn CapabilityOracle>>,
}

impl RouteResolver {
    /// Resolver with static rules only.
    pub fn new(topology: Arc<ChainTopology>) -> Self {
        Self {
            topology,
            oracle: None,
        }
    }

    /// Gate native routes on a live capability oracle.
    pub fn with_oracle(mut self, oracle: Arc<dyn CapabilityOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn topology(&self) -> &ChainTopology {
        &self.topology
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Classify a native-token route and canonicalize both ends.
    pub fn classify(
        &self,
        source: &str,
        destination: &str,
        symbol: NativeToken,
    ) -> DomainResult<Route> {
        let topology = &self.topology;
        let mismatch = |err: TopologyError| match err {
            TopologyError::CrossEcosystemMismatch {
                chain,
                expected_relay,
            } => DomainError::CrossEcosystemMismatch {
                symbol: symbol.to_string(),
                chain,
                relay: expected_relay,
            },
            TopologyError::NotFound(chain) => DomainError::InvalidSource {
                symbol: symbol.to_string(),
                src: chain,
            },
        };

        // Step 1: "<Relay> Asset Hub" aliases
        let src_name = topology.normalize_hub_alias(source, symbol).map_err(mismatch)?;
        let dst_name = topology
            .normalize_hub_alias(destination, symbol)
            .map_err(mismatch)?;

        let invalid_source = || DomainError::InvalidSource {
            symbol: symbol.to_string(),
            src: source.to_string(),
        };
        let relay = topology.relay_of(symbol).ok_or_else(invalid_source)?;
        let is_own_relay = |name: &str| normalize_chain_name(name) == normalize_chain_name(relay);

        // Relay membership always wins over the parachain table
        let src_is_relay = topology.is_relay_chain(&src_name);
        let dst_is_relay = topology.is_relay_chain(&dst_name);

        // Step 2: source legality for this asset
        let src_entry = if src_is_relay {
            if !is_own_relay(src_name.as_ref()) {
                return Err(invalid_source());
            }
            None
        } else {
            Some(
                topology
                    .find_parachain(&src_name, symbol)
                    .ok_or_else(invalid_source)?,
            )
        };

        // Step 3: classification
        let (classification, src, dst) = match (src_entry, dst_is_relay) {
            (None, true) => {
                return Err(DomainError::RelayToRelayForbidden {
                    src: source.to_string(),
                    dst: destination.to_string(),
                });
            }
            (Some(src_entry), false) => {
                let dst_entry = topology.find_parachain(&dst_name, symbol).ok_or_else(|| {
                    DomainError::NotOnSameRelay {
                        src: source.to_string(),
                        dst: destination.to_string(),
                    }
                })?;
                (
                    RouteClassification::SameRelaySystemChainToSystemChain,
                    src_entry.canonical_id.as_str(),
                    dst_entry.canonical_id.as_str(),
                )
            }
            (Some(src_entry), true) => {
                if !is_own_relay(dst_name.as_ref()) {
                    return Err(DomainError::SystemChainNotFound {
                        relay: destination.to_string(),
                        chain: source.to_string(),
                    });
                }
                (
                    RouteClassification::SystemChainToRelay,
                    src_entry.canonical_id.as_str(),
                    relay,
                )
            }
            (None, false) => {
                let Some(dst_entry) = topology.find_parachain(&dst_name, symbol) else {
                    if topology.is_parachain_elsewhere(&dst_name, symbol) {
                        return Err(DomainError::NotOnSameRelay {
                            src: source.to_string(),
                            dst: destination.to_string(),
                        });
                    }
                    return Err(DomainError::SystemChainNotFound {
                        relay: source.to_string(),
                        chain: destination.to_string(),
                    });
                };
                (
                    RouteClassification::RelayToSystemChain,
                    relay,
                    dst_entry.canonical_id.as_str(),
                )
            }
        };

        Ok(Route {
            classification,
            src: src.to_string(),
            dst: dst.to_string(),
        })
    }

    /// Resolve a native-token teleport.
    #[instrument(skip_all, fields(symbol = %intent.symbol, src = %intent.source, dst = %intent.destination))]
    pub async fn resolve_transfer(&self, intent: &TransferIntent) -> DomainResult<Prepared> {
        let route = self.classify(&intent.source, &intent.destination, intent.symbol)?;

        if !intent.amount.is_positive() {
            return Err(DomainError::NonPositiveAmount {
                subject: "the transfer amount",
            });
        }
        let units = intent.amount.to_minimal_units(intent.symbol.decimals())?;

        AddressScheme::Ss58.require(&intent.sender, AddressField::Sender)?;
        if let Some(recipient) = &intent.recipient {
            AddressScheme::Ss58.require(recipient, AddressField::Recipient)?;
        }

        self.check_capability(intent.symbol.into(), &route).await?;
        debug!(classification = ?route.classification, "Route resolved");

        let beneficiary = intent.recipient.as_deref().unwrap_or(&intent.sender);
        let message = format!(
            "Teleporting {} {} tokens from {} to {}.\nRecipient: {}\nPlease sign and submit the transaction using your wallet.",
            intent.amount, intent.symbol, route.src, route.dst, beneficiary
        );

        Ok(Prepared::new(
            TransactionDescriptor {
                src: route.src,
                dst: route.dst,
                amount: units,
                asset_symbol: intent.symbol.into(),
                sender_address: intent.sender.clone(),
                recipient_address: intent.recipient.clone(),
                asset_id: None,
            },
            message,
        ))
    }

    /// Resolve a stablecoin reserve transfer out of the asset hub.
    #[instrument(skip_all, fields(symbol = %intent.symbol, src = %intent.source, dst = %intent.destination))]
    pub fn resolve_stablecoin(&self, intent: &StablecoinIntent) -> DomainResult<Prepared> {
        let route = self.classify_stablecoin(intent)?;
        let scheme = STABLECOIN_DESTINATIONS
            .iter()
            .find(|(chain, _)| *chain == route.dst)
            .map(|(_, scheme)| *scheme)
            .unwrap_or(AddressScheme::Ss58);

        if !intent.amount.is_positive() {
            return Err(DomainError::NonPositiveAmount {
                subject: "the transfer amount",
            });
        }
        let units = intent.amount.to_minimal_units(intent.symbol.decimals())?;

        AddressScheme::Ss58.require(&intent.sender, AddressField::Sender)?;
        scheme.require(&intent.recipient, AddressField::Recipient)?;
        debug!(classification = ?route.classification, "Stablecoin route resolved");

        let message = format!(
            "Sending {} {} from {} to {}.\nRecipient ({} address): {}\nPlease sign and submit the transaction using your wallet.",
            intent.amount, intent.symbol, route.src, route.dst, scheme, intent.recipient
        );

        Ok(Prepared::new(
            TransactionDescriptor {
                src: route.src,
                dst: route.dst,
                amount: units,
                asset_symbol: intent.symbol.into(),
                sender_address: intent.sender.clone(),
                recipient_address: Some(intent.recipient.clone()),
                asset_id: Some(intent.symbol.asset_id()),
            },
            message,
        ))
    }

    fn classify_stablecoin(&self, intent: &StablecoinIntent) -> DomainResult<Route> {
        let home = intent.symbol.home_network();
        let unsupported = || DomainError::UnsupportedStablecoinRoute {
            symbol: intent.symbol.to_string(),
            src: intent.source.clone(),
            dst: intent.destination.clone(),
        };

        let src = self
            .topology
            .resolve_canonical(&intent.source, home)
            .map_err(|_| unsupported())?;
        if src != STABLECOIN_SOURCE_CHAIN {
            return Err(unsupported());
        }

        let dst = self
            .topology
            .resolve_canonical(&intent.destination, home)
            .map_err(|_| unsupported())?;
        if !STABLECOIN_DESTINATIONS.iter().any(|(chain, _)| *chain == dst) {
            return Err(unsupported());
        }

        Ok(Route {
            classification: RouteClassification::StablecoinHubToDestination,
            src: src.to_string(),
            dst: dst.to_string(),
        })
    }

    /// Fail-closed oracle gate. Passes when no oracle is configured.
    async fn check_capability(&self, symbol: AssetSymbol, route: &Route) -> DomainResult<()> {
        let Some(oracle) = &self.oracle else {
            return Ok(());
        };

        let reject = |reason| DomainError::CapabilityCheckFailed {
            symbol: symbol.to_string(),
            src: route.src.clone(),
            dst: route.dst.clone(),
            reason,
        };

        match query_oracle(oracle.as_ref(), symbol, route).await {
            Ok(true) => {
                record_capability_check("supported");
                Ok(())
            }
            Ok(false) => {
                record_capability_check("unsupported");
                Err(reject(CapabilityFailure::Unsupported))
            }
            Err(e) => {
                warn!(error = %e, "⚠️  Capability oracle unavailable, rejecting route");
                record_capability_check("unavailable");
                Err(reject(CapabilityFailure::Unavailable))
            }
        }
    }
}

async fn query_oracle(
    oracle: &dyn CapabilityOracle,
    symbol: AssetSymbol,
    route: &Route,
) -> ChainResult<bool> {
    Ok(oracle.supports_asset(&route.src, symbol).await?
        && oracle.supports_asset(&route.dst, symbol).await?
        && oracle
            .asset_supported_on_route(symbol, &route.src, &route.dst)
            .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, RejectionKind};
    use crate::models::{Amount, PreparedTransaction, Stablecoin};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use subxt_core::utils::AccountId32;

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const EVM: &str = "0x6Be02d1d3665660d22FF9624b7BE0551ee1Ac91b";

    fn resolver() -> RouteResolver {
        RouteResolver::new(Arc::new(ChainTopology::default()))
    }

    fn intent(symbol: NativeToken, src: &str, dst: &str, amount: &str) -> TransferIntent {
        TransferIntent {
            source: src.into(),
            destination: dst.into(),
            symbol,
            amount: Amount::parse(amount).unwrap(),
            sender: ALICE.into(),
            recipient: None,
        }
    }

    fn stablecoin(symbol: Stablecoin, src: &str, dst: &str, recipient: &str) -> StablecoinIntent {
        StablecoinIntent {
            source: src.into(),
            destination: dst.into(),
            symbol,
            amount: Amount::parse("10").unwrap(),
            sender: ALICE.into(),
            recipient: recipient.into(),
        }
    }

    fn descriptor(prepared: Prepared) -> TransactionDescriptor {
        match prepared.tx {
            PreparedTransaction::XcmTransfer(d) => d,
            other => panic!("unexpected tx: {other:?}"),
        }
    }

    struct MockOracle {
        chain_supported: bool,
        route_supported: bool,
        fail: bool,
        chain_calls: AtomicUsize,
        route_calls: AtomicUsize,
    }

    impl MockOracle {
        fn new(chain_supported: bool, route_supported: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                chain_supported,
                route_supported,
                fail,
                chain_calls: AtomicUsize::new(0),
                route_calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> (usize, usize) {
            (
                self.chain_calls.load(Ordering::SeqCst),
                self.route_calls.load(Ordering::SeqCst),
            )
        }
    }

    #[async_trait]
    impl CapabilityOracle for MockOracle {
        async fn supports_asset(&self, _: &str, _: AssetSymbol) -> ChainResult<bool> {
            self.chain_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ChainError::ConnectionFailed("ws closed".into()));
            }
            Ok(self.chain_supported)
        }

        async fn asset_supported_on_route(&self, _: AssetSymbol, _: &str, _: &str) -> ChainResult<bool> {
            self.route_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.route_supported)
        }
    }

    // Test critique: 5 DOT de Polkadot vers AssetHub
    #[tokio::test]
    async fn test_dot_relay_to_asset_hub() {
        let prepared = resolver()
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "AssetHub", "5"))
            .await
            .unwrap();
        assert!(prepared.message.contains("Polkadot"));

        let tx = descriptor(prepared);
        assert_eq!(tx.src, "Polkadot");
        assert_eq!(tx.dst, "AssetHubPolkadot");
        assert_eq!(tx.amount, "50000000000");
        assert_eq!(tx.asset_id, None);
    }

    // Test critique: relais vers lui-même interdit pour chaque symbole
    #[test]
    fn test_relay_to_relay_forbidden_for_every_symbol() {
        let resolver = resolver();
        for network in resolver.topology().networks() {
            let err = resolver
                .classify(&network.relay, &network.relay, network.symbol)
                .unwrap_err();
            assert_eq!(err.kind(), RejectionKind::RelayToRelayForbidden, "{}", network.relay);
        }
    }

    // Test critique: parachains d'un même relais → ids canoniques uniquement
    #[test]
    fn test_parachain_pairs_are_canonicalized() {
        let resolver = resolver();
        for network in resolver.topology().networks() {
            let paras: Vec<_> = network.parachains().collect();
            for src in &paras {
                for dst in &paras {
                    let route = resolver
                        .classify(&src.display_name, &dst.display_name, network.symbol)
                        .unwrap();
                    assert_eq!(route.classification, RouteClassification::SameRelaySystemChainToSystemChain);
                    assert_eq!(route.src, src.canonical_id);
                    assert_eq!(route.dst, dst.canonical_id);
                }
            }
        }
    }

    // Test critique: pas de repli entre tables d'actifs différents
    #[test]
    fn test_foreign_parachain_from_relay_is_rejected() {
        let resolver = resolver();
        let topology = resolver.topology();
        for x in topology.networks() {
            for y in topology.networks().iter().filter(|y| y.symbol != x.symbol) {
                for para in y.parachains() {
                    if topology.find_parachain(&para.display_name, x.symbol).is_some() {
                        continue;
                    }
                    let err = resolver
                        .classify(&x.relay, &para.display_name, x.symbol)
                        .unwrap_err();
                    assert!(
                        matches!(err.kind(), RejectionKind::NotOnSameRelay | RejectionKind::InvalidSource),
                        "{} -> {} with {}: {err}",
                        x.relay, para.display_name, x.symbol
                    );
                }
            }
        }
    }

    #[test]
    fn test_wnd_from_polkadot_is_rejected() {
        let err = resolver()
            .classify("Polkadot", "AssetHub", NativeToken::Wnd)
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidSource);

        let err = resolver()
            .classify("Polkadot Asset Hub", "Westend", NativeToken::Wnd)
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::CrossEcosystemMismatch);
    }

    #[test]
    fn test_hub_alias_routes() {
        let route = resolver()
            .classify("Paseo Asset Hub", "paseo", NativeToken::Pas)
            .unwrap();
        assert_eq!(route.classification, RouteClassification::SystemChainToRelay);
        assert_eq!(route.src, "AssetHubPaseo");
        assert_eq!(route.dst, "Paseo");
    }

    #[test]
    fn test_parachain_to_foreign_relay() {
        let err = resolver()
            .classify("AssetHub", "Paseo", NativeToken::Dot)
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::SystemChainNotFound);
        assert_eq!(err.to_string(), "Paseo doesn't have AssetHub as a system chain.");
    }

    #[test]
    fn test_unknown_chains() {
        let resolver = resolver();
        let err = resolver.classify("Atlantis", "Polkadot", NativeToken::Dot).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidSource);

        let err = resolver.classify("Polkadot", "Atlantis", NativeToken::Dot).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::SystemChainNotFound);

        let err = resolver.classify("AssetHub", "Atlantis", NativeToken::Dot).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::NotOnSameRelay);

        // KSM n'a pas de table XCM
        let err = resolver.classify("Kusama", "AssetHub", NativeToken::Ksm).unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidSource);
    }

    #[tokio::test]
    async fn test_transfer_validates_amount_and_addresses() {
        let resolver = resolver();

        let err = resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "AssetHub", "0"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAmount);

        let mut bad_sender = intent(NativeToken::Dot, "Polkadot", "AssetHub", "1");
        bad_sender.sender = "not-an-address".into();
        let err = resolver.resolve_transfer(&bad_sender).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAddress);

        let mut with_recipient = intent(NativeToken::Wnd, "AssetHub", "Westend", "0.5");
        with_recipient.recipient = Some(AccountId32([3u8; 32]).to_string());
        let tx = descriptor(resolver.resolve_transfer(&with_recipient).await.unwrap());
        assert_eq!(tx.amount, "500000000000");
        assert_eq!(tx.dst, "Westend");
    }

    // Test critique: oracle en échec => rejet (fail-closed)
    #[tokio::test]
    async fn test_oracle_failure_rejects() {
        let oracle = MockOracle::new(true, true, true);
        let resolver = resolver().with_oracle(oracle.clone());
        let err = resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "AssetHub", "1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::CapabilityCheckFailed);
        assert!(!err.to_string().contains("ws closed"));
    }

    #[tokio::test]
    async fn test_oracle_refusal_rejects_and_support_passes() {
        let resolver = resolver().with_oracle(MockOracle::new(true, false, false));
        let err = resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "AssetHub", "1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CapabilityCheckFailed { reason: CapabilityFailure::Unsupported, .. }
        ));

        let oracle = MockOracle::new(true, true, false);
        let resolver = RouteResolver::new(Arc::new(ChainTopology::default())).with_oracle(oracle.clone());
        resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "AssetHub", "1"))
            .await
            .unwrap();
        assert_eq!(oracle.calls(), (2, 1));
    }

    // Test critique: un actif inconnu d'une chaîne suffit à rejeter, la route n'est pas interrogée
    #[tokio::test]
    async fn test_chain_without_asset_rejects_before_route_query() {
        let oracle = MockOracle::new(false, true, false);
        let resolver = resolver().with_oracle(oracle.clone());
        let err = resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "Hydration", "1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::CapabilityCheckFailed { reason: CapabilityFailure::Unsupported, .. }
        ));
        let (chain_calls, route_calls) = oracle.calls();
        assert_eq!(chain_calls, 1);
        assert_eq!(route_calls, 0);
    }

    // Test critique: l'oracle n'est jamais consulté pour une route illégale
    #[tokio::test]
    async fn test_oracle_not_called_for_illegal_route() {
        let oracle = MockOracle::new(true, true, false);
        let resolver = resolver().with_oracle(oracle.clone());
        assert!(resolver
            .resolve_transfer(&intent(NativeToken::Dot, "Polkadot", "Westend", "1"))
            .await
            .is_err());
        assert_eq!(oracle.calls(), (0, 0));
    }

    #[test]
    fn test_usdt_to_hydration() {
        let recipient = AccountId32([5u8; 32]).to_string();
        let prepared = resolver()
            .resolve_stablecoin(&stablecoin(Stablecoin::Usdt, "AssetHub", "Hydration", &recipient))
            .unwrap();
        let tx = descriptor(prepared);
        assert_eq!(tx.src, "AssetHubPolkadot");
        assert_eq!(tx.dst, "Hydration");
        assert_eq!(tx.asset_id, Some(1984));
        assert_eq!(tx.amount, "10000000");
    }

    #[test]
    fn test_usdc_to_moonbeam_requires_evm_recipient() {
        let resolver = resolver();
        let tx = descriptor(
            resolver
                .resolve_stablecoin(&stablecoin(Stablecoin::Usdc, "Polkadot Asset Hub", "moonbeam", EVM))
                .unwrap(),
        );
        assert_eq!(tx.dst, "Moonbeam");
        assert_eq!(tx.asset_id, Some(1337));

        let err = resolver
            .resolve_stablecoin(&stablecoin(Stablecoin::Usdc, "AssetHub", "Moonbeam", ALICE))
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAddress);

        let err = resolver
            .resolve_stablecoin(&stablecoin(Stablecoin::Usdt, "AssetHub", "Hydration", EVM))
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAddress);
    }

    // Test critique: hors liste blanche => toujours rejeté
    #[test]
    fn test_stablecoin_destination_whitelist() {
        let resolver = resolver();
        for symbol in Stablecoin::ALL {
            for dst in ["Acala", "Astar", "Polkadot", "AssetHub", "Penpal", "Westend Asset Hub"] {
                let err = resolver
                    .resolve_stablecoin(&stablecoin(symbol, "AssetHub", dst, ALICE))
                    .unwrap_err();
                assert_eq!(err.kind(), RejectionKind::UnsupportedStablecoinRoute, "{symbol} -> {dst}");
            }
            let err = resolver
                .resolve_stablecoin(&stablecoin(symbol, "Hydration", "Moonbeam", EVM))
                .unwrap_err();
            assert_eq!(err.kind(), RejectionKind::UnsupportedStablecoinRoute);
        }
    }
}
