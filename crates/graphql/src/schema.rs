//! GraphQL schema definition.
//!
//! Exposes the tool catalogue, the chain topology and the tool dispatcher.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Object, Result, Schema};
use tracing::debug;

use ferry_core::models::{ChainTopology, NativeToken};
use ferry_core::ports::{ToolCall, ToolContext};
use ferry_core::services::ToolDispatcher;

use crate::types::{CallToolResult, FerrySchema, RelayChain, SystemChain, Tool, ToolContextInput};

// -----------------------------------------------------------------------------
// Schema Configuration
// -----------------------------------------------------------------------------

/// Maximum query depth to prevent deeply nested queries (DoS protection).
/// Note: GraphQL introspection requires depth ~13, so we use 15 to allow it.
pub const MAX_QUERY_DEPTH: usize = 15;

/// Maximum query complexity score (DoS protection).
/// Each field has a default complexity of 1, nested objects multiply.
pub const MAX_QUERY_COMPLEXITY: usize = 500;

/// Maximum length of a tool name argument.
const MAX_TOOL_NAME_LENGTH: usize = 64;

// -----------------------------------------------------------------------------
// Schema Builder
// -----------------------------------------------------------------------------

/// Build the schema with depth and complexity limits.
pub fn build_schema(dispatcher: Arc<ToolDispatcher>, topology: Arc<ChainTopology>) -> FerrySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(dispatcher)
        .data(topology)
        .limit_depth(MAX_QUERY_DEPTH)
        .limit_complexity(MAX_QUERY_COMPLEXITY)
        .finish()
}

// -----------------------------------------------------------------------------
// Query
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Tools the orchestration loop can call, in listing order.
    async fn tools<'ctx>(&self, ctx: &Context<'ctx>) -> Result<Vec<Tool>> {
        let dispatcher = ctx.data::<Arc<ToolDispatcher>>()?;
        Ok(dispatcher
            .registry()
            .definitions()
            .into_iter()
            .map(Tool::from)
            .collect())
    }

    /// Relay chains with an XCM routing table.
    async fn relay_chains<'ctx>(&self, ctx: &Context<'ctx>) -> Result<Vec<RelayChain>> {
        let topology = ctx.data::<Arc<ChainTopology>>()?;
        Ok(topology.networks().iter().map(RelayChain::from).collect())
    }

    /// Chains reachable from a relay, for one native symbol or all of them.
    async fn system_chains<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        symbol: Option<String>,
    ) -> Result<Vec<SystemChain>> {
        let topology = ctx.data::<Arc<ChainTopology>>()?;

        let networks: Vec<_> = match symbol {
            Some(symbol) => {
                let token = parse_symbol(&symbol)?;
                let network = topology.network(token).ok_or_else(|| {
                    async_graphql::Error::new(format!("{token} has no cross-chain routing table"))
                })?;
                vec![network]
            }
            None => topology.networks().iter().collect(),
        };

        Ok(networks
            .into_iter()
            .flat_map(|network| {
                network
                    .parachains()
                    .map(move |entry| SystemChain::new(entry, network))
            })
            .collect())
    }
}

// -----------------------------------------------------------------------------
// Mutation
// -----------------------------------------------------------------------------

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Run a tool. Rejections come back as `success: false`, never as errors.
    async fn call_tool<'ctx>(
        &self,
        ctx: &Context<'ctx>,
        name: String,
        #[graphql(default)] input: serde_json::Value,
        context: Option<ToolContextInput>,
    ) -> Result<CallToolResult> {
        validate_tool_name(&name)?;
        let dispatcher = ctx.data::<Arc<ToolDispatcher>>()?;

        debug!(tool = %name, "GraphQL tool call");

        let call = ToolCall {
            tool_name: name,
            input,
        };
        let tool_ctx: ToolContext = context.unwrap_or_default().into();
        let response = dispatcher.dispatch(&call, &tool_ctx).await;

        CallToolResult::try_from(response)
            .map_err(|e| async_graphql::Error::new(format!("Failed to encode transaction: {e}")))
    }
}

// -----------------------------------------------------------------------------
// Helpers & Validation
// -----------------------------------------------------------------------------

fn parse_symbol(s: &str) -> Result<NativeToken> {
    s.parse::<NativeToken>()
        .map_err(|e| async_graphql::Error::new(e.to_string()))
}

fn validate_tool_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(async_graphql::Error::new("Tool name cannot be empty"));
    }
    if name.len() > MAX_TOOL_NAME_LENGTH {
        return Err(async_graphql::Error::new(format!(
            "Tool name too long: maximum {} characters allowed",
            MAX_TOOL_NAME_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ferry_core::error::{DomainError, ToolResult};
    use ferry_core::models::{NativeTransferDescriptor, Prepared, ToolResponse};
    use ferry_core::ports::{ToolDefinition, ToolHandler, ToolRegistry};
    use ferry_core::services::DispatcherConfig;
    use serde_json::{Value, json};

    struct PayTool;

    #[async_trait]
    impl ToolHandler for PayTool {
        fn name(&self) -> &'static str { "pay" }
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "pay",
                description: "pay someone",
                input_schema: json!({ "type": "object" }),
            }
        }
        async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
            if input.get("fail").is_some() {
                return Err(DomainError::NoNominationTargets.into());
            }
            Ok(Prepared::new(
                NativeTransferDescriptor {
                    to: "5Bob".to_string(),
                    amount: "10".to_string(),
                    token: NativeToken::Dot,
                    sender_address: ctx.active_account.clone(),
                },
                "prepared",
            )
            .into())
        }
    }

    fn schema() -> FerrySchema {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(PayTool));
        let dispatcher = ToolDispatcher::new(Arc::new(registry), DispatcherConfig::default());
        build_schema(Arc::new(dispatcher), Arc::new(ChainTopology::default()))
    }

    #[tokio::test]
    async fn test_tools_query() {
        let res = schema().execute("{ tools { name description inputSchema } }").await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["tools"][0]["name"], "pay");
        assert_eq!(data["tools"][0]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_topology_queries() {
        let res = schema()
            .execute("{ relayChains { name symbol decimals } systemChains(symbol: \"wnd\") { displayName canonicalId relay } }")
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();

        assert_eq!(data["relayChains"].as_array().unwrap().len(), 3);
        assert_eq!(data["relayChains"][0]["name"], "Polkadot");
        assert_eq!(data["relayChains"][0]["decimals"], 10);
        assert_eq!(data["systemChains"][0]["displayName"], "AssetHub");
        assert_eq!(data["systemChains"][0]["canonicalId"], "AssetHubWestend");
        assert_eq!(data["systemChains"][0]["relay"], "Westend");
    }

    // Test critique: KSM n'a pas de table de routage, erreur GraphQL explicite
    #[tokio::test]
    async fn test_system_chains_without_table() {
        let res = schema().execute("{ systemChains(symbol: \"KSM\") { displayName } }").await;
        assert_eq!(res.errors.len(), 1);
        assert!(res.errors[0].message.contains("KSM"));
    }

    #[tokio::test]
    async fn test_call_tool_prepared() {
        let res = schema()
            .execute(r#"mutation { callTool(name: "pay", input: {}, context: { activeAccount: "5Alice" }) { success message call tx rejection } }"#)
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        let result = &data["callTool"];

        assert_eq!(result["success"], true);
        assert_eq!(result["call"], "nativeTransfer");
        assert_eq!(result["tx"]["senderAddress"], "5Alice");
        assert!(result["rejection"].is_null());
    }

    // Test critique: un rejet est une réponse normale, pas une erreur GraphQL
    #[tokio::test]
    async fn test_call_tool_rejections() {
        let res = schema()
            .execute(r#"mutation { callTool(name: "pay", input: { fail: true }) { success message rejection tx } }"#)
            .await;
        assert!(res.errors.is_empty(), "{:?}", res.errors);
        let data = res.data.into_json().unwrap();
        assert_eq!(data["callTool"]["success"], false);
        assert_eq!(data["callTool"]["rejection"], "CardinalityExceeded");
        assert!(data["callTool"]["tx"].is_null());

        let res = schema()
            .execute(r#"mutation { callTool(name: "fly") { success rejection } }"#)
            .await;
        let data = res.data.into_json().unwrap();
        assert_eq!(data["callTool"]["rejection"], "UnknownTool");
    }

    #[test]
    fn test_validate_tool_name_boundaries() {
        assert!(validate_tool_name("").is_err());
        assert!(validate_tool_name(&"a".repeat(65)).is_err());
        assert!(validate_tool_name("xcmTransfer").is_ok());
    }
}
