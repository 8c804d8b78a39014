//! Typed requests built at ingress, one per tool invocation.
//!
//! Primitive shapes (strings, numbers, enums) are already checked when these
//! are constructed; services only enforce domain legality.

use serde::{Deserialize, Serialize};

use crate::models::{Amount, NativeToken, Stablecoin};

// =============================================================================
// Transfers
// =============================================================================

/// Cross-chain move of a native token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
    /// Raw source chain name, as typed by the user.
    pub source: String,
    /// Raw destination chain name.
    pub destination: String,
    pub symbol: NativeToken,
    pub amount: Amount,
    pub sender: String,
    pub recipient: Option<String>,
}

/// Stablecoin reserve transfer out of the asset hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StablecoinIntent {
    pub source: String,
    pub destination: String,
    pub symbol: Stablecoin,
    pub amount: Amount,
    pub sender: String,
    pub recipient: String,
}

/// Explicit user answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confirmation {
    Yes,
    No,
}

/// Same-chain transfer on the active network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTransferRequest {
    pub sender: Option<String>,
    pub recipient: String,
    pub amount: Amount,
    pub token: NativeToken,
    pub confirmation: Option<Confirmation>,
}

/// Route category derived from topology lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteClassification {
    RelayToRelay,
    SameRelaySystemChainToSystemChain,
    SystemChainToRelay,
    RelayToSystemChain,
    StablecoinHubToDestination,
}

/// A legal route with both ends canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub classification: RouteClassification,
    pub src: String,
    pub dst: String,
}

// =============================================================================
// Staking
// =============================================================================

/// Reward destination as selected by the user; `Account` needs an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayeeSelector {
    Staked,
    Stash,
    Controller,
    Account,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondRequest {
    pub stash: String,
    /// Defaults to the stash when absent.
    pub controller: Option<String>,
    pub value: Amount,
    pub token: NativeToken,
    pub payee: PayeeSelector,
    pub reward_account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbondRequest {
    pub controller: String,
    pub value: Amount,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NominateRequest {
    pub controller: String,
    pub targets: Vec<String>,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPoolRequest {
    pub member: String,
    pub amount: Amount,
    /// Raw id; must be a positive integer.
    pub pool_id: i64,
    pub token: NativeToken,
}

/// Discriminated source of an extra pool bond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BondExtraSource {
    FreeBalance(Amount),
    Rewards,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondExtraPoolRequest {
    pub member: String,
    pub extra: BondExtraSource,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnbondFromPoolRequest {
    pub member: String,
    pub unbonding_points: Amount,
    pub token: NativeToken,
}
