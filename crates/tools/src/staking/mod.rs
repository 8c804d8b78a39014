//! Direct staking: bond, nominate and unbond.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use ferry_core::error::ToolResult;
use ferry_core::models::{BondRequest, NominateRequest, PayeeSelector, ToolResponse, UnbondRequest};
use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
use ferry_core::services::{prepare_bond, prepare_nominate, prepare_unbond};

use crate::bundle::ToolBundle;
use crate::utils::InputReader;

pub const BOND: &str = "bond";
pub const NOMINATE: &str = "nominate";
pub const UNBOND: &str = "unbond";

fn token_property() -> Value {
    json!({
        "type": "string",
        "enum": ["DOT", "KSM", "WND", "PAS"],
        "description": "Token symbol of the staking network. Defaults to the active network's token, then DOT."
    })
}

// =============================================================================
// bond
// =============================================================================

pub struct BondTool;

#[async_trait]
impl ToolHandler for BondTool {
    fn name(&self) -> &'static str {
        BOND
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: BOND,
            description: "Bond tokens for staking and choose where rewards are paid. Use the active account as stash unless the user names another.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "stashAccount": { "type": "string", "description": "Stash account holding the funds." },
                    "controllerAccount": { "type": "string", "description": "Controller account. Defaults to the stash." },
                    "value": { "type": ["number", "string"], "description": "Amount of tokens to bond." },
                    "tokenSymbol": token_property(),
                    "payee": { "type": "string", "enum": ["Staked", "Stash", "Controller", "Account", "None"], "description": "Reward destination." },
                    "rewardAccount": { "type": "string", "description": "Account receiving rewards when payee is Account." }
                },
                "required": ["stashAccount", "value", "payee"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(BOND, input)?;
        let request = BondRequest {
            stash: reader.string("stashAccount")?,
            controller: reader.optional_string("controllerAccount")?.filter(|s| !s.is_empty()),
            value: reader.amount("value")?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
            payee: reader.choice::<PayeeSelector>("payee")?,
            reward_account: reader.optional_string("rewardAccount")?,
        };
        Ok(prepare_bond(&request)?.into())
    }
}

// =============================================================================
// nominate
// =============================================================================

pub struct NominateTool;

#[async_trait]
impl ToolHandler for NominateTool {
    fn name(&self) -> &'static str {
        NOMINATE
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: NOMINATE,
            description: "Nominate validators with a bonded controller account. Polkadot, Westend and Paseo allow up to 16 targets, Kusama up to 24.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controllerAccount": { "type": "string", "description": "Controller account signing the nomination." },
                    "targets": { "type": "array", "items": { "type": "string" }, "description": "SS58 addresses of the validators to nominate." },
                    "tokenSymbol": token_property()
                },
                "required": ["controllerAccount", "targets"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(NOMINATE, input)?;
        let request = NominateRequest {
            controller: reader.string("controllerAccount")?,
            targets: reader.string_list("targets")?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
        };
        Ok(prepare_nominate(&request)?.into())
    }
}

// =============================================================================
// unbond
// =============================================================================

pub struct UnbondTool;

#[async_trait]
impl ToolHandler for UnbondTool {
    fn name(&self) -> &'static str {
        UNBOND
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: UNBOND,
            description: "Unbond staked tokens. Funds become withdrawable after the network's unbonding period.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "controllerAccount": { "type": "string", "description": "Controller account of the bonded stash." },
                    "value": { "type": ["number", "string"], "description": "Amount of tokens to unbond." },
                    "tokenSymbol": token_property()
                },
                "required": ["controllerAccount", "value"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let reader = InputReader::new(UNBOND, input)?;
        let request = UnbondRequest {
            controller: reader.string("controllerAccount")?,
            value: reader.amount("value")?,
            token: reader.native_token_or_default("tokenSymbol", ctx)?,
        };
        Ok(prepare_unbond(&request)?.into())
    }
}

pub struct StakingBundle;

impl ToolBundle for StakingBundle {
    fn name(&self) -> &'static str {
        "staking"
    }

    fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
        vec![Arc::new(BondTool), Arc::new(NominateTool), Arc::new(UnbondTool)]
    }
}
