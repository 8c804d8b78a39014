//! Nomination pools: join, bond extra and unbond.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::{ToolError, ToolResult};
use ferry_core::models::{
    BondExtraPoolRequest, BondExtraSource, JoinPoolRequest, ToolResponse, UnbondFromPoolRequest,
};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::{prepare_bond_extra_pool, prepare_join_pool, prepare_unbond_from_pool};

use crate::bundle::ToolBundle;
use crate::utils::InputReader;

pub const JOIN_POOL: &str = "joinPool";
pub const BOND_EXTRA_POOL: &str = "bondExtraPool";
pub const UNBOND_FROM_POOL: &str = "unbondFromPool";

fn token_property() -> Value {
    json!({
        "type": "string",
        "enum": ["DOT", "KSM", "WND", "PAS"],
        "description": "Token symbol of the pool's network. Defaults to the active network's token, then DOT."
    })
}

// =============================================================================
// joinPool
// =============================================================================

pub struct JoinPoolTool;

#[async_trait]
impl ToolHandler for JoinPoolTool {
    fn name(&self) -> &'static str {
        JOIN_POOL
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: JOIN_POOL,
            description: "Join a nomination pool by bonding tokens into it. The network's minimum pool bond applies.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "senderAddress": { "type": "string", "description": "Account joining the pool." },
                    "amount": { "type": ["number", "string"], "description": "Amount of tokens to bond into the pool." },
                    "poolId": { "type": "integer", "minimum": 1, "description": "Id of the pool to join." },
                    "tokenSymbol": token_property()
                },
                "required": ["senderAddress", "amount", "poolId"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(JOIN_POOL, input)?;
        let request = JoinPoolRequest {
            member: reader.string("senderAddress")?,
            amount: reader.amount("amount")?,
            pool_id: reader.integer("poolId")?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
        };
        Ok(prepare_join_pool(&request)?.into())
    }
}

// =============================================================================
// bondExtraPool
// =============================================================================

pub struct BondExtraPoolTool;

impl BondExtraPoolTool {
    fn parse_extra(reader: &InputReader<'_>) -> ToolResult<BondExtraSource> {
        let extra = reader.object("extra")?;
        match extra.string("type")?.as_str() {
            "FreeBalance" => Ok(BondExtraSource::FreeBalance(extra.amount("amount")?)),
            "Rewards" if extra.has("amount") => Err(ToolError::invalid_input(
                BOND_EXTRA_POOL,
                "`amount` is not accepted with type Rewards, rewards are re-staked in full",
            )),
            "Rewards" => Ok(BondExtraSource::Rewards),
            other => Err(ToolError::invalid_input(
                BOND_EXTRA_POOL,
                format!("unsupported extra type `{other}`, expected FreeBalance or Rewards"),
            )),
        }
    }
}

#[async_trait]
impl ToolHandler for BondExtraPoolTool {
    fn name(&self) -> &'static str {
        BOND_EXTRA_POOL
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: BOND_EXTRA_POOL,
            description: "Bond more funds into the nomination pool the member already belongs to, either from free balance or by re-staking rewards.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "memberAddress": { "type": "string", "description": "Pool member account." },
                    "extra": {
                        "oneOf": [
                            {
                                "type": "object",
                                "properties": {
                                    "type": { "const": "FreeBalance" },
                                    "amount": { "type": ["number", "string"], "description": "Amount of free balance to bond." }
                                },
                                "required": ["type", "amount"]
                            },
                            {
                                "type": "object",
                                "properties": { "type": { "const": "Rewards" } },
                                "required": ["type"],
                                "additionalProperties": false
                            }
                        ]
                    },
                    "tokenSymbol": token_property()
                },
                "required": ["memberAddress", "extra"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(BOND_EXTRA_POOL, input)?;
        let request = BondExtraPoolRequest {
            member: reader.string("memberAddress")?,
            extra: Self::parse_extra(&reader)?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
        };
        Ok(prepare_bond_extra_pool(&request)?.into())
    }
}

// =============================================================================
// unbondFromPool
// =============================================================================

pub struct UnbondFromPoolTool;

#[async_trait]
impl ToolHandler for UnbondFromPoolTool {
    fn name(&self) -> &'static str {
        UNBOND_FROM_POOL
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: UNBOND_FROM_POOL,
            description: "Unbond points from a nomination pool. Funds are withdrawable after the network's unbonding period.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "memberAddress": { "type": "string", "description": "Pool member account." },
                    "unbondingPoints": { "type": ["number", "string"], "description": "Points to unbond, in tokens." },
                    "tokenSymbol": token_property()
                },
                "required": ["memberAddress", "unbondingPoints"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(UNBOND_FROM_POOL, input)?;
        let request = UnbondFromPoolRequest {
            member: reader.string("memberAddress")?,
            unbonding_points: reader.amount("unbondingPoints")?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
        };
        Ok(prepare_unbond_from_pool(&request)?.into())
    }
}

pub struct PoolsBundle;

impl ToolBundle for PoolsBundle {
    fn name(&self) -> &'static str {
        "pools"
    }

    fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
        vec![
            Arc::new(JoinPoolTool),
            Arc::new(BondExtraPoolTool),
            Arc::new(UnbondFromPoolTool),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::error::RejectionKind;
    use ferry_core::models::{BondExtra, PreparedTransaction};

    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    #[tokio::test]
    async fn test_join_pool() {
        let input = json!({ "senderAddress": ALICE, "amount": 5, "poolId": 12 });
        let response = JoinPoolTool.call(&input, &ToolContext::default()).await.unwrap();
        let Some(PreparedTransaction::JoinPool(tx)) = response.tx else {
            panic!("expected a pool join");
        };
        assert_eq!(tx.pool_id, 12);
        assert_eq!(tx.amount, "50000000000");
    }

    // Test critique: le message de rejet nomme le minimum du réseau
    #[tokio::test]
    async fn test_join_pool_rejections() {
        let input = json!({ "senderAddress": ALICE, "amount": "0.5", "poolId": 1 });
        let err = JoinPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "The minimum bond amount for joining a pool on Polkadot is 1.00 DOT."
        );

        let input = json!({ "senderAddress": ALICE, "amount": 5, "poolId": 0 });
        let err = JoinPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::CardinalityExceeded);

        let input = json!({ "senderAddress": ALICE, "amount": 5, "poolId": 1.5 });
        let err = JoinPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_bond_extra_variants() {
        let input = json!({ "memberAddress": ALICE, "extra": { "type": "FreeBalance", "amount": 2 } });
        let response = BondExtraPoolTool.call(&input, &ToolContext::default()).await.unwrap();
        let Some(PreparedTransaction::BondExtraPool(tx)) = response.tx else {
            panic!("expected a bond extra");
        };
        assert_eq!(tx.extra, BondExtra::FreeBalance("20000000000".to_string()));

        let input = json!({ "memberAddress": ALICE, "extra": { "type": "Rewards" } });
        let response = BondExtraPoolTool.call(&input, &ToolContext::default()).await.unwrap();
        assert!(response.message.contains("re-staking Rewards"));

        // Test critique: les deux modes restent exclusifs
        let input = json!({ "memberAddress": ALICE, "extra": { "type": "Rewards", "amount": 5 } });
        let err = BondExtraPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidInput);
        assert!(err.to_string().contains("Rewards"));

        let input = json!({ "memberAddress": ALICE, "extra": { "type": "Everything" } });
        let err = BondExtraPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert_eq!(err.kind(), RejectionKind::InvalidInput);

        let input = json!({ "memberAddress": ALICE, "extra": { "type": "FreeBalance" } });
        let err = BondExtraPoolTool.call(&input, &ToolContext::default()).await.unwrap_err();
        assert!(err.to_string().contains("`amount`"));
    }

    #[tokio::test]
    async fn test_unbond_from_pool() {
        let input = json!({ "memberAddress": ALICE, "unbondingPoints": 1.25, "tokenSymbol": "PAS" });
        let response = UnbondFromPoolTool.call(&input, &ToolContext::default()).await.unwrap();
        let Some(PreparedTransaction::UnbondFromPool(tx)) = response.tx else {
            panic!("expected a pool unbond");
        };
        assert_eq!(tx.unbonding_points, "12500000000");
        assert!(response.message.contains("approximately 2 days"));
    }
}
