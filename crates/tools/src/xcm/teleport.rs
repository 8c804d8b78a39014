//! `xcmTransfer` - native token teleports between a relay and its system chains.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::ToolResult;
use ferry_core::models::{NativeToken, ToolResponse, TransferIntent};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::RouteResolver;

use crate::utils::{InputReader, account_or_active};

pub const XCM_TRANSFER: &str = "xcmTransfer";

/// Tokens with an XCM routing table.
pub const TELEPORT_TOKENS: [NativeToken; 3] = [NativeToken::Dot, NativeToken::Wnd, NativeToken::Pas];

pub struct XcmTransferTool {
    resolver: Arc<RouteResolver>,
}

impl XcmTransferTool {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }

    fn parse_intent(input: &Value, ctx: &ToolContext) -> ToolResult<TransferIntent> {
        let reader = InputReader::new(XCM_TRANSFER, input)?;
        Ok(TransferIntent {
            source: reader.string("src")?,
            destination: reader.string("dst")?,
            symbol: reader.native_token("symbol", &TELEPORT_TOKENS)?,
            amount: reader.amount("amount")?,
            sender: account_or_active(XCM_TRANSFER, reader.optional_string("address")?, ctx, "address")?,
            recipient: reader.optional_string("recipient")?.filter(|s| !s.is_empty()),
        })
    }
}

#[async_trait]
impl ToolHandler for XcmTransferTool {
    fn name(&self) -> &'static str {
        XCM_TRANSFER
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: XCM_TRANSFER,
            description: "Teleport DOT, WND or PAS between a relay chain and its system chains, or between two system chains of the same relay. Use the active account as address and the active network as source unless the user says otherwise.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "src": { "type": "string", "description": "The source network/chain to teleport from." },
                    "dst": { "type": "string", "description": "The destination network/chain to teleport to." },
                    "amount": { "type": ["number", "string"], "description": "The amount of tokens to teleport." },
                    "symbol": { "type": "string", "enum": ["DOT", "WND", "PAS"], "description": "The symbol of the token to teleport." },
                    "address": { "type": "string", "description": "SS58 address to teleport from. Defaults to the active account." },
                    "recipient": { "type": "string", "description": "Optional SS58 beneficiary on the destination chain." }
                },
                "required": ["src", "dst", "amount", "symbol"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let intent = Self::parse_intent(input, ctx)?;
        let prepared = self.resolver.resolve_transfer(&intent).await?;
        Ok(prepared.into())
    }

    fn priority(&self) -> i32 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::error::RejectionKind;
    use ferry_core::models::{ChainTopology, PreparedTransaction};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn tool() -> XcmTransferTool {
        XcmTransferTool::new(Arc::new(RouteResolver::new(Arc::new(ChainTopology::default()))))
    }

    // Test critique: l'adresse par défaut est le compte actif
    #[tokio::test]
    async fn test_sender_defaults_to_active_account() {
        let input = json!({ "src": "Polkadot", "dst": "AssetHub", "amount": 5, "symbol": "DOT" });
        let response = tool().call(&input, &ToolContext::new(ALICE)).await.unwrap();

        let Some(PreparedTransaction::XcmTransfer(tx)) = response.tx else {
            panic!("expected an XCM transfer");
        };
        assert_eq!(tx.sender_address, ALICE);
        assert_eq!(tx.amount, "50000000000");
        assert_eq!(tx.dst, "AssetHubPolkadot");
    }

    #[tokio::test]
    async fn test_rejects_ksm_and_missing_fields() {
        let input = json!({ "src": "Kusama", "dst": "AssetHub", "amount": 1, "symbol": "KSM", "address": ALICE });
        let err = tool().call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidInput);

        let input = json!({ "src": "Polkadot", "amount": 1, "symbol": "DOT", "address": ALICE });
        let err = tool().call(&input, &ToolContext::default()).await.unwrap_err();
        assert!(err.to_string().contains("`dst`"));
    }

    #[tokio::test]
    async fn test_domain_rejection_passes_through() {
        let input = json!({ "src": "Polkadot", "dst": "Westend", "amount": "1", "symbol": "DOT" });
        let err = tool().call(&input, &ToolContext::new(ALICE)).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::RelayToRelayForbidden);
    }
}
