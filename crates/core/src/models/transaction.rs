//! Prepared transactions handed to the external signer.
//!
//! The core never submits anything. Every successful tool call yields one of
//! these descriptors plus a confirmation message; amounts are always
//! minimal-unit integer strings.

use serde::Serialize;

use crate::error::{RejectionKind, ToolError};
use crate::models::{AssetSymbol, NativeToken};

/// Cross-chain transfer descriptor.
///
/// `src` and `dst` are canonical chain identifiers, never display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    pub src: String,
    pub dst: String,
    /// Minimal units, decimal integer string.
    pub amount: String,
    pub asset_symbol: AssetSymbol,
    pub sender_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
    /// Asset class id (stablecoins only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<u32>,
}

/// Same-chain `transfer_keep_alive` on the active network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransferDescriptor {
    pub to: String,
    pub amount: String,
    pub token: NativeToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
}

/// Where staking rewards are paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RewardDestination {
    Staked,
    Stash,
    Controller,
    Account(String),
    None,
}

impl std::fmt::Display for RewardDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Staked => f.write_str("Staked"),
            Self::Stash => f.write_str("Stash"),
            Self::Controller => f.write_str("Controller"),
            Self::Account(account) => write!(f, "Account:{account}"),
            Self::None => f.write_str("None"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondDescriptor {
    pub stash_account: String,
    pub controller_account: String,
    pub value: String,
    pub payee: RewardDestination,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NominateDescriptor {
    pub controller_account: String,
    pub targets: Vec<String>,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbondDescriptor {
    pub controller_account: String,
    pub value: String,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPoolDescriptor {
    pub sender_address: String,
    pub amount: String,
    pub pool_id: u32,
    pub token: NativeToken,
}

/// Source of the extra bond: `{"FreeBalance": units}` or `"Rewards"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BondExtra {
    FreeBalance(String),
    Rewards,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondExtraPoolDescriptor {
    pub member_address: String,
    pub extra: BondExtra,
    pub token: NativeToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnbondFromPoolDescriptor {
    pub member_address: String,
    pub unbonding_points: String,
    pub token: NativeToken,
}

/// Any transaction the core can prepare, tagged by call on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "camelCase")]
pub enum PreparedTransaction {
    XcmTransfer(TransactionDescriptor),
    NativeTransfer(NativeTransferDescriptor),
    Bond(BondDescriptor),
    Nominate(NominateDescriptor),
    Unbond(UnbondDescriptor),
    JoinPool(JoinPoolDescriptor),
    BondExtraPool(BondExtraPoolDescriptor),
    UnbondFromPool(UnbondFromPoolDescriptor),
}

impl PreparedTransaction {
    pub fn call_name(&self) -> &'static str {
        match self {
            Self::XcmTransfer(_) => "xcmTransfer",
            Self::NativeTransfer(_) => "nativeTransfer",
            Self::Bond(_) => "bond",
            Self::Nominate(_) => "nominate",
            Self::Unbond(_) => "unbond",
            Self::JoinPool(_) => "joinPool",
            Self::BondExtraPool(_) => "bondExtraPool",
            Self::UnbondFromPool(_) => "unbondFromPool",
        }
    }
}

/// A validated transaction and the message the user must confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub tx: PreparedTransaction,
    pub message: String,
}

impl Prepared {
    pub fn new(tx: impl Into<PreparedTransaction>, message: impl Into<String>) -> Self {
        Self {
            tx: tx.into(),
            message: message.into(),
        }
    }
}

macro_rules! impl_into_prepared {
    ($($variant:ident => $descriptor:ty),* $(,)?) => {
        $(
            impl From<$descriptor> for PreparedTransaction {
                fn from(descriptor: $descriptor) -> Self {
                    Self::$variant(descriptor)
                }
            }
        )*
    };
}

impl_into_prepared! {
    XcmTransfer => TransactionDescriptor,
    NativeTransfer => NativeTransferDescriptor,
    Bond => BondDescriptor,
    Nominate => NominateDescriptor,
    Unbond => UnbondDescriptor,
    JoinPool => JoinPoolDescriptor,
    BondExtraPool => BondExtraPoolDescriptor,
    UnbondFromPool => UnbondFromPoolDescriptor,
}

// =============================================================================
// Tool response
// =============================================================================

/// What every tool call returns: `{tx?, message, rejection?}`.
///
/// `message` is always present and safe to show verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<PreparedTransaction>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionKind>,
}

impl ToolResponse {
    /// Informational reply without a transaction (listings, prompts).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            tx: None,
            message: message.into(),
            rejection: None,
        }
    }

    pub fn rejected(kind: RejectionKind, message: impl Into<String>) -> Self {
        Self {
            tx: None,
            message: message.into(),
            rejection: Some(kind),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}

impl From<Prepared> for ToolResponse {
    fn from(prepared: Prepared) -> Self {
        Self {
            tx: Some(prepared.tx),
            message: prepared.message,
            rejection: None,
        }
    }
}

impl From<&ToolError> for ToolResponse {
    fn from(err: &ToolError) -> Self {
        Self::rejected(err.kind(), err.to_string())
    }
}
