//! Error types for the Ferry domain layer.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`DomainError`] - Routing and validation rejections (user-facing)
//! - [`ChainError`] - Capability oracle / RPC errors
//! - [`ToolError`] - Top-level tool dispatch errors
//!
//! Every `Display` string of [`DomainError`] is a complete sentence that can
//! be relayed verbatim to the user. Error conversion is automatic via `From`
//! implementations, allowing `?` to work across error boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AddressField, AddressScheme, NativeToken};

// =============================================================================
// Rejection taxonomy
// =============================================================================

/// Stable tag identifying the category of a rejection.
///
/// Returned alongside the rejection message and used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionKind {
    InvalidSource,
    SystemChainNotFound,
    NotOnSameRelay,
    RelayToRelayForbidden,
    CrossEcosystemMismatch,
    UnsupportedStablecoinRoute,
    InvalidAddress,
    InvalidAmount,
    CardinalityExceeded,
    CapabilityCheckFailed,
    /// Input did not match the tool's declared schema.
    InvalidInput,
    /// No tool registered under the requested name.
    UnknownTool,
}

impl RejectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidSource => "InvalidSource",
            Self::SystemChainNotFound => "SystemChainNotFound",
            Self::NotOnSameRelay => "NotOnSameRelay",
            Self::RelayToRelayForbidden => "RelayToRelayForbidden",
            Self::CrossEcosystemMismatch => "CrossEcosystemMismatch",
            Self::UnsupportedStablecoinRoute => "UnsupportedStablecoinRoute",
            Self::InvalidAddress => "InvalidAddress",
            Self::InvalidAmount => "InvalidAmount",
            Self::CardinalityExceeded => "CardinalityExceeded",
            Self::CapabilityCheckFailed => "CapabilityCheckFailed",
            Self::InvalidInput => "InvalidInput",
            Self::UnknownTool => "UnknownTool",
        }
    }
}

impl std::fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Domain Errors
// =============================================================================

/// Why the capability oracle refused a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityFailure {
    /// The oracle answered and the asset is not supported.
    Unsupported,
    /// The oracle could not be reached or failed to answer.
    Unavailable,
}

impl std::fmt::Display for CapabilityFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported => f.write_str("the asset is not supported on this route"),
            Self::Unavailable => f.write_str("asset support could not be confirmed right now"),
        }
    }
}

/// Routing and validation rejections.
///
/// These are recoverable, user-facing outcomes. None of them is fatal to the
/// process; the dispatcher turns each one into a response message.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Source chain is neither the asset's relay chain nor one of its system chains.
    #[error("Invalid teleport: {symbol} cannot be teleported from {src}.")]
    InvalidSource { symbol: String, src: String },

    /// A relay chain does not list the given chain as one of its system chains.
    #[error("{relay} doesn't have {chain} as a system chain.")]
    SystemChainNotFound { relay: String, chain: String },

    /// Both chains are parachains but not under the same relay for this asset.
    #[error("{src} and {dst} are not on the same relay chain.")]
    NotOnSameRelay { src: String, dst: String },

    /// Teleporting between two relay chains is never permitted.
    #[error("Teleport cannot be done between relay chains. {src} and {dst} are relay chains.")]
    RelayToRelayForbidden { src: String, dst: String },

    /// A "<Relay> Asset Hub" name points at another ecosystem than the asset's.
    #[error("Teleport {symbol} cannot be done from or to {chain}: {symbol} only moves within the {relay} ecosystem.")]
    CrossEcosystemMismatch {
        symbol: String,
        chain: String,
        relay: String,
    },

    /// Stablecoins only leave the asset hub towards whitelisted chains.
    #[error("Invalid transfer from {src} to {dst} for stablecoin {symbol}. Use src: AssetHub and dst: Hydration or Moonbeam.")]
    UnsupportedStablecoinRoute {
        symbol: String,
        src: String,
        dst: String,
    },

    /// Address failed validation for its scheme.
    #[error("The provided {field} address is not a valid {scheme} address.")]
    InvalidAddress {
        field: AddressField,
        scheme: AddressScheme,
    },

    /// A required address was not supplied.
    #[error("Please provide a {field} address.")]
    MissingAddress { field: AddressField },

    /// Amount could not be parsed or converted.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Amount must be strictly positive.
    #[error("Please provide a positive numeric value for {subject}.")]
    NonPositiveAmount { subject: &'static str },

    /// Amount is below the network minimum for joining a pool.
    #[error("The minimum bond amount for joining a pool on {network} is {minimum} {symbol}.")]
    BelowMinimumBond {
        network: &'static str,
        minimum: String,
        symbol: NativeToken,
    },

    /// Nomination without any target.
    #[error("Please provide at least one validator to nominate.")]
    NoNominationTargets,

    /// Nomination target list exceeds the network maximum.
    #[error("You can nominate a maximum of {max} validators on {network}.")]
    TooManyNominations { max: usize, network: &'static str },

    /// Pool identifier missing, zero or negative.
    #[error("Please provide a valid pool ID ({0} is not a positive pool identifier).")]
    InvalidPoolId(i64),

    /// The asset-support oracle refused the route or could not answer.
    #[error("Cannot send {symbol} from {src} to {dst}: {reason}.")]
    CapabilityCheckFailed {
        symbol: String,
        src: String,
        dst: String,
        reason: CapabilityFailure,
    },
}

impl DomainError {
    /// Taxonomy tag for this rejection.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::InvalidSource { .. } => RejectionKind::InvalidSource,
            Self::SystemChainNotFound { .. } => RejectionKind::SystemChainNotFound,
            Self::NotOnSameRelay { .. } => RejectionKind::NotOnSameRelay,
            Self::RelayToRelayForbidden { .. } => RejectionKind::RelayToRelayForbidden,
            Self::CrossEcosystemMismatch { .. } => RejectionKind::CrossEcosystemMismatch,
            Self::UnsupportedStablecoinRoute { .. } => RejectionKind::UnsupportedStablecoinRoute,
            Self::InvalidAddress { .. } | Self::MissingAddress { .. } => {
                RejectionKind::InvalidAddress
            }
            Self::Amount(_) | Self::NonPositiveAmount { .. } | Self::BelowMinimumBond { .. } => {
                RejectionKind::InvalidAmount
            }
            Self::NoNominationTargets
            | Self::TooManyNominations { .. }
            | Self::InvalidPoolId(_) => RejectionKind::CardinalityExceeded,
            Self::CapabilityCheckFailed { .. } => RejectionKind::CapabilityCheckFailed,
        }
    }
}

// =============================================================================
// Amount Errors
// =============================================================================

/// Decimal amount parsing and conversion errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Not a finite decimal number.
    #[error("Invalid amount: '{0}' is not a decimal number.")]
    Malformed(String),

    /// Negative amounts are never accepted.
    #[error("Invalid amount: '{0}' is negative.")]
    Negative(String),

    /// More fractional digits than the asset can represent.
    #[error("Invalid amount: {amount} has more than {decimals} decimal places.")]
    TooPrecise { amount: String, decimals: u32 },
}

// =============================================================================
// Topology Errors
// =============================================================================

/// Chain name lookup failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Name does not resolve in the asset's table.
    #[error("Unknown chain: {0}")]
    NotFound(String),

    /// "<Relay> Asset Hub" with a relay other than the asset's.
    #[error("{chain} does not belong to {expected_relay}")]
    CrossEcosystemMismatch {
        chain: String,
        expected_relay: String,
    },
}

/// Unknown token symbol at ingress.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported token symbol: {0}")]
pub struct UnknownSymbol(pub String);

// =============================================================================
// Chain Errors
// =============================================================================

/// Capability oracle transport errors.
///
/// These errors occur when querying Substrate nodes over WebSocket RPC.
#[derive(Debug, Error)]
pub enum ChainError {
    /// WebSocket connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// RPC request failed.
    #[error("RPC error: {0}")]
    RpcError(String),

    /// Runtime metadata could not be fetched or inspected.
    #[error("Metadata error: {0}")]
    MetadataError(String),

    /// No endpoint configured for this chain.
    #[error("No endpoint configured for chain: {0}")]
    UnknownChain(String),

    /// Endpoint list could not be parsed.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

// =============================================================================
// Tool Errors
// =============================================================================

/// Top-level tool dispatch errors.
///
/// This is the error type returned by [`crate::ports::ToolHandler::call`].
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool registered under this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Input does not match the tool's declared schema.
    #[error("Invalid input for {tool}: {message}")]
    InvalidInput { tool: String, message: String },

    /// Input exceeds the configured size limit.
    #[error("Tool input too large: {size} > {max} bytes")]
    InputTooLarge { size: usize, max: usize },

    /// Domain rejection.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ToolError {
    /// Shorthand for a schema violation.
    pub fn invalid_input(tool: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    /// Taxonomy tag for this error.
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::UnknownTool(_) => RejectionKind::UnknownTool,
            Self::InvalidInput { .. } | Self::InputTooLarge { .. } => RejectionKind::InvalidInput,
            Self::Domain(e) => e.kind(),
        }
    }
}

impl From<AmountError> for ToolError {
    fn from(e: AmountError) -> Self {
        Self::Domain(DomainError::Amount(e))
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Result type for tool dispatch.
pub type ToolResult<T> = Result<T, ToolError>;
