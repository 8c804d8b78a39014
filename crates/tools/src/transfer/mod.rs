//! Same-chain native transfers with a confirmation round-trip.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::{ToolError, ToolResult};
use ferry_core::models::{Confirmation, NativeTransferRequest, ToolResponse};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::prepare_native_transfer;

use crate::bundle::ToolBundle;
use crate::utils::InputReader;

pub const TRANSFER: &str = "transfer";

pub struct TransferTool;

impl TransferTool {
    fn parse_request(input: &Value, ctx: &ToolContext) -> ToolResult<NativeTransferRequest> {
        let reader = InputReader::new(TRANSFER, input)?;
        let confirmation = match reader.optional_string("confirm")? {
            None => None,
            Some(answer) => match answer.to_lowercase().as_str() {
                "yes" => Some(Confirmation::Yes),
                "no" => Some(Confirmation::No),
                _ => {
                    return Err(ToolError::invalid_input(
                        TRANSFER,
                        format!("field `confirm` must be 'yes' or 'no', got `{answer}`"),
                    ));
                }
            },
        };

        Ok(NativeTransferRequest {
            sender: ctx.active_account.clone(),
            recipient: reader.string("to")?,
            amount: reader.amount("amount")?,
            token: reader.native_token_or_default("symbol", ctx)?,
            confirmation,
        })
    }
}

#[async_trait]
impl ToolHandler for TransferTool {
    fn name(&self) -> &'static str {
        TRANSFER
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TRANSFER,
            description: "Transfer native tokens to another address on the same chain. The first call returns a confirmation prompt; call again with confirm set to the user's answer.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "to": { "type": "string", "description": "Recipient SS58 address." },
                    "amount": { "type": ["number", "string"], "description": "Amount of tokens to send." },
                    "symbol": { "type": "string", "enum": ["DOT", "KSM", "WND", "PAS"], "description": "Token symbol. Defaults to the active network's token, then DOT." },
                    "confirm": { "type": "string", "enum": ["yes", "no"], "description": "The user's answer to the confirmation prompt." }
                },
                "required": ["to", "amount"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let request = Self::parse_request(input, ctx)?;
        Ok(prepare_native_transfer(&request)?.into())
    }
}

pub struct TransferBundle;

impl ToolBundle for TransferBundle {
    fn name(&self) -> &'static str {
        "transfer"
    }

    fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
        vec![Arc::new(TransferTool)]
    }

    fn priority(&self) -> i32 {
        50
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::error::RejectionKind;
    use ferry_core::models::{NativeToken, PreparedTransaction};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";
    const BOB: &str = "5FHneW46xGXgs5mUiveU4sbTyGBzmstUspZC92UhjJM694ty";

    // Test critique: sans confirmation, aucun descripteur n'est produit
    #[tokio::test]
    async fn test_confirmation_flow() {
        let ctx = ToolContext::new(ALICE);

        let prompt = TransferTool
            .call(&json!({ "to": BOB, "amount": 2 }), &ctx)
            .await
            .unwrap();
        assert!(prompt.tx.is_none());
        assert!(prompt.message.contains("Type 'yes' to confirm"));

        let cancelled = TransferTool
            .call(&json!({ "to": BOB, "amount": 2, "confirm": "No" }), &ctx)
            .await
            .unwrap();
        assert_eq!(cancelled.message, "Transfer cancelled by user.");
        assert!(cancelled.tx.is_none());

        let confirmed = TransferTool
            .call(&json!({ "to": BOB, "amount": 2, "confirm": "yes" }), &ctx)
            .await
            .unwrap();
        let Some(PreparedTransaction::NativeTransfer(tx)) = confirmed.tx else {
            panic!("expected a native transfer");
        };
        assert_eq!(tx.amount, "20000000000");
        assert_eq!(tx.token, NativeToken::Dot);
        assert_eq!(tx.sender_address.as_deref(), Some(ALICE));
    }

    #[tokio::test]
    async fn test_symbol_follows_active_chain() {
        let ctx = ToolContext::new(ALICE).with_chain("Kusama");
        let response = TransferTool
            .call(&json!({ "to": BOB, "amount": "0.5", "confirm": "yes" }), &ctx)
            .await
            .unwrap();
        let Some(PreparedTransaction::NativeTransfer(tx)) = response.tx else {
            panic!("expected a native transfer");
        };
        assert_eq!(tx.token, NativeToken::Ksm);
        assert_eq!(tx.amount, "500000000000");
    }

    #[tokio::test]
    async fn test_invalid_inputs() {
        let ctx = ToolContext::new(ALICE);

        let err = TransferTool
            .call(&json!({ "to": "nope", "amount": 1 }), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidAddress);

        let err = TransferTool
            .call(&json!({ "to": BOB, "amount": 1, "confirm": "maybe" }), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidInput);
    }
}
