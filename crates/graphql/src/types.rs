//! GraphQL type definitions.

use async_graphql::{EmptySubscription, InputObject, Schema, SimpleObject};

use ferry_core::models::{ChainEntry, RelayNetwork, ToolResponse};
use ferry_core::ports::{ToolContext, ToolDefinition};

use crate::schema::{MutationRoot, QueryRoot};

/// The Ferry GraphQL schema type.
pub type FerrySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// A declared tool.
#[derive(SimpleObject)]
pub struct Tool {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool input.
    pub input_schema: serde_json::Value,
}

impl From<ToolDefinition> for Tool {
    fn from(d: ToolDefinition) -> Self {
        Self {
            name: d.name.to_string(),
            description: d.description.to_string(),
            input_schema: d.input_schema,
        }
    }
}

/// Relay chain type.
#[derive(SimpleObject)]
pub struct RelayChain {
    pub name: String,
    pub symbol: String,
    pub decimals: i32,
    pub chain_count: i32,
}

impl From<&RelayNetwork> for RelayChain {
    fn from(n: &RelayNetwork) -> Self {
        Self {
            name: n.relay.clone(),
            symbol: n.symbol.to_string(),
            decimals: n.symbol.decimals() as i32,
            chain_count: n.parachains().count() as i32,
        }
    }
}

/// A chain reachable from a relay with its native token.
#[derive(SimpleObject)]
pub struct SystemChain {
    pub display_name: String,
    pub canonical_id: String,
    pub relay: String,
    pub symbol: String,
}

impl SystemChain {
    pub fn new(entry: &ChainEntry, network: &RelayNetwork) -> Self {
        Self {
            display_name: entry.display_name.clone(),
            canonical_id: entry.canonical_id.clone(),
            relay: network.relay.clone(),
            symbol: network.symbol.to_string(),
        }
    }
}

/// Conversation context for a tool call.
#[derive(InputObject, Default)]
pub struct ToolContextInput {
    pub active_account: Option<String>,
    pub active_chain: Option<String>,
}

impl From<ToolContextInput> for ToolContext {
    fn from(input: ToolContextInput) -> Self {
        Self {
            active_account: input.active_account.filter(|a| !a.trim().is_empty()),
            active_chain: input.active_chain.filter(|c| !c.trim().is_empty()),
        }
    }
}

/// Outcome of a tool call.
#[derive(SimpleObject)]
pub struct CallToolResult {
    /// False when the call was rejected.
    pub success: bool,
    pub message: String,
    /// Name of the prepared call (e.g., "xcmTransfer", "bond").
    pub call: Option<String>,
    /// Prepared transaction descriptor, for the client to sign.
    pub tx: Option<serde_json::Value>,
    pub rejection: Option<String>,
}

impl TryFrom<ToolResponse> for CallToolResult {
    type Error = serde_json::Error;

    fn try_from(r: ToolResponse) -> Result<Self, Self::Error> {
        let call = r.tx.as_ref().map(|tx| tx.call_name().to_string());
        let tx = r.tx.as_ref().map(serde_json::to_value).transpose()?;
        Ok(Self {
            success: r.rejection.is_none(),
            message: r.message,
            call,
            tx,
            rejection: r.rejection.map(|kind| kind.as_str().to_string()),
        })
    }
}
