//! Account address validation.
//!
//! Two independent schemes are supported:
//!
//! - SS58 (chain-native accounts), or the equivalent 0x-prefixed hex raw key
//! - Ethereum-style 20-byte hex accounts (EVM parachains such as Moonbeam)
//!
//! Both predicates are pure and never panic on malformed input.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subxt_core::utils::AccountId32;

use crate::error::{DomainError, DomainResult};

/// Length of a Substrate account public key.
pub const ACCOUNT_ID_LEN: usize = 32;

/// Length of an Ethereum-style account.
pub const ETH_ADDRESS_LEN: usize = 20;

/// Longest SS58 string for a 32-byte account (2-byte prefix). Leading zero
/// bytes shrink the encoding, so there is no useful lower bound.
pub const MAX_SS58_ADDRESS_LEN: usize = 50;

/// Is `candidate` a chain-native account identifier?
///
/// Accepts SS58 strings with a valid checksum (any network prefix) and
/// 0x-prefixed hex encodings of a 32-byte public key.
pub fn is_valid_account_address(candidate: &str) -> bool {
    if let Some(hex_key) = strip_hex_prefix(candidate) {
        return decodes_to_len(hex_key, ACCOUNT_ID_LEN);
    }

    if candidate.len() > MAX_SS58_ADDRESS_LEN {
        return false;
    }

    AccountId32::from_str(candidate).is_ok()
}

/// Is `candidate` an Ethereum-style 20-byte hex account?
pub fn is_valid_external_address(candidate: &str) -> bool {
    strip_hex_prefix(candidate).is_some_and(|hex_addr| decodes_to_len(hex_addr, ETH_ADDRESS_LEN))
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

fn decodes_to_len(hex_str: &str, len: usize) -> bool {
    hex_str.len() == len * 2 && hex::decode(hex_str).is_ok()
}

// =============================================================================
// Scheme & field
// =============================================================================

/// Address scheme expected for a given field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressScheme {
    Ss58,
    Ethereum,
}

impl AddressScheme {
    pub fn is_valid(&self, candidate: &str) -> bool {
        match self {
            Self::Ss58 => is_valid_account_address(candidate),
            Self::Ethereum => is_valid_external_address(candidate),
        }
    }

    /// Reject `candidate` with a field-specific error when it is empty or invalid.
    pub fn require(&self, candidate: &str, field: AddressField) -> DomainResult<()> {
        if candidate.trim().is_empty() {
            return Err(DomainError::MissingAddress { field });
        }
        if !self.is_valid(candidate) {
            return Err(DomainError::InvalidAddress {
                field,
                scheme: *self,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for AddressScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ss58 => f.write_str("SS58"),
            Self::Ethereum => f.write_str("Ethereum"),
        }
    }
}

/// Which input an address came from, for per-field rejection messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Sender,
    Recipient,
    Stash,
    Controller,
    RewardAccount,
    Member,
    /// Zero-based position in a nomination target list.
    NominationTarget(usize),
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sender => f.write_str("sender"),
            Self::Recipient => f.write_str("recipient"),
            Self::Stash => f.write_str("stash account"),
            Self::Controller => f.write_str("controller account"),
            Self::RewardAccount => f.write_str("reward account"),
            Self::Member => f.write_str("member"),
            Self::NominationTarget(index) => write!(f, "validator #{}", index + 1),
        }
    }
}
