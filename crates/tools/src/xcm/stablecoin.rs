//! `xcmStablecoinFromAssetHub` - USDT/USDC out of the Polkadot asset hub.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::ToolResult;
use ferry_core::models::{StablecoinIntent, ToolResponse};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::RouteResolver;

use crate::utils::{InputReader, account_or_active};

pub const XCM_STABLECOIN: &str = "xcmStablecoinFromAssetHub";

pub struct StablecoinTransferTool {
    resolver: Arc<RouteResolver>,
}

impl StablecoinTransferTool {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }

    fn parse_intent(input: &Value, ctx: &ToolContext) -> ToolResult<StablecoinIntent> {
        let reader = InputReader::new(XCM_STABLECOIN, input)?;
        Ok(StablecoinIntent {
            source: reader.string("src")?,
            destination: reader.string("dst")?,
            symbol: reader.stablecoin("symbol")?,
            amount: reader.amount("amount")?,
            sender: account_or_active(XCM_STABLECOIN, reader.optional_string("sender")?, ctx, "sender")?,
            // Validated against the destination's scheme by the resolver
            recipient: reader.optional_string("address")?.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl ToolHandler for StablecoinTransferTool {
    fn name(&self) -> &'static str {
        XCM_STABLECOIN
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: XCM_STABLECOIN,
            description: "Send stablecoins (USDT or USDC) from AssetHub to Hydration or Moonbeam. Always ask the user for the recipient address; Moonbeam recipients are Ethereum-style 0x addresses.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "src": { "type": "string", "description": "The source network/chain. Must be AssetHub." },
                    "dst": { "type": "string", "enum": ["Hydration", "Moonbeam"], "description": "The destination network/chain." },
                    "amount": { "type": ["number", "string"], "description": "The amount of stablecoins to transfer." },
                    "symbol": { "type": "string", "enum": ["USDT", "USDC"], "description": "The symbol of the stablecoin to transfer." },
                    "address": { "type": "string", "description": "The recipient address on the destination chain." },
                    "sender": { "type": "string", "description": "SS58 address sending the funds. Defaults to the active account." }
                },
                "required": ["src", "dst", "amount", "symbol", "address"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let intent = Self::parse_intent(input, ctx)?;
        let prepared = self.resolver.resolve_stablecoin(&intent)?;
        Ok(prepared.into())
    }

    fn priority(&self) -> i32 {
        10
    }
}
