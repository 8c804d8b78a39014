//! Read-only topology listings for the orchestration loop.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::ToolResult;
use ferry_core::models::{RelayNetwork, ToolResponse};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::RouteResolver;

use super::teleport::TELEPORT_TOKENS;
use crate::utils::InputReader;

pub const GET_RELAY_CHAINS: &str = "getAvailableRelayChains";
pub const GET_SYSTEM_CHAINS: &str = "getAvailableSystemChains";

fn chain_line(network: &RelayNetwork) -> String {
    let names: Vec<&str> = network
        .parachains()
        .map(|entry| entry.display_name.as_str())
        .collect();
    format!("{} ({}): {}", network.relay, network.symbol, names.join(", "))
}

// =============================================================================
// getAvailableRelayChains
// =============================================================================

pub struct RelayChainsTool {
    resolver: Arc<RouteResolver>,
}

impl RelayChainsTool {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ToolHandler for RelayChainsTool {
    fn name(&self) -> &'static str {
        GET_RELAY_CHAINS
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_RELAY_CHAINS,
            description: "Get the list of available relay chains/networks for cross-chain transfers.",
            input_schema: json!({ "type": "object", "properties": {}, "additionalProperties": false }),
        }
    }

    async fn call(&self, _input: &Value, _ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let relays: Vec<String> = self
            .resolver
            .topology()
            .networks()
            .iter()
            .map(|network| format!("{} ({})", network.relay, network.symbol))
            .collect();
        Ok(ToolResponse::message(format!(
            "Available relay chains: {}.",
            relays.join(", ")
        )))
    }
}

// =============================================================================
// getAvailableSystemChains
// =============================================================================

pub struct SystemChainsTool {
    resolver: Arc<RouteResolver>,
}

impl SystemChainsTool {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl ToolHandler for SystemChainsTool {
    fn name(&self) -> &'static str {
        GET_SYSTEM_CHAINS
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: GET_SYSTEM_CHAINS,
            description: "Get the list of available system chains/networks for cross-chain transfers, for every relay or for one token symbol.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": { "type": "string", "enum": ["DOT", "WND", "PAS"], "description": "Only list chains reachable with this token." }
                },
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, _ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(GET_SYSTEM_CHAINS, input)?;
        let topology = self.resolver.topology();

        let lines: Vec<String> = match reader.optional_string("symbol")? {
            Some(_) => {
                let token = reader.native_token("symbol", &TELEPORT_TOKENS)?;
                topology.network(token).map(chain_line).into_iter().collect()
            }
            None => topology.networks().iter().map(chain_line).collect(),
        };

        Ok(ToolResponse::message(format!(
            "Available system chains:\n{}",
            lines.join("\n")
        )))
    }
}
