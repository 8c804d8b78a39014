//! Tool dispatcher - the boundary the orchestration loop talks to.
//!
//! Every call returns a [`ToolResponse`]; errors are converted into a
//! rejection message here and never propagate further.

use std::sync::Arc;

use tracing::{debug, instrument, trace};

use crate::error::{ToolError, ToolResult};
use crate::metrics::{CallOutcome, CallTimer, record_rejection, record_tool_call};
use crate::models::ToolResponse;
use crate::ports::{ToolCall, ToolContext, ToolRegistry, estimate_json_size};

// =============================================================================
// Configuration
// =============================================================================

/// Default maximum size of a tool input (64 KiB).
pub const DEFAULT_MAX_INPUT_SIZE: usize = 64 * 1024;

/// Configuration for the dispatcher.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Inputs estimated above this many bytes are rejected before parsing.
    pub max_input_size: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

// =============================================================================
// Dispatcher
// =============================================================================

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    config: DispatcherConfig,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run one tool call.
    #[instrument(skip_all, fields(tool = %call.tool_name))]
    pub async fn dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> ToolResponse {
        let _timer = CallTimer::new();
        let known = self.registry.has_tool(&call.tool_name);
        // Unknown names are user input; keep them out of metric labels
        let label = if known { call.tool_name.as_str() } else { "unknown" };

        match self.try_dispatch(call, ctx).await {
            Ok(response) => {
                let outcome = if response.tx.is_some() {
                    CallOutcome::Prepared
                } else {
                    CallOutcome::Message
                };
                trace!(outcome = outcome.as_str(), "Tool call completed");
                record_tool_call(label, outcome);
                response
            }
            Err(err) => {
                let kind = err.kind();
                debug!(kind = %kind, error = %err, "Tool call rejected");
                record_rejection(label, kind);
                record_tool_call(label, CallOutcome::Rejected);
                ToolResponse::from(&err)
            }
        }
    }

    async fn try_dispatch(&self, call: &ToolCall, ctx: &ToolContext) -> ToolResult<ToolResponse> {
        let tool = self
            .registry
            .get(&call.tool_name)
            .ok_or_else(|| ToolError::UnknownTool(call.tool_name.clone()))?;

        let size = estimate_json_size(&call.input);
        if size > self.config.max_input_size {
            return Err(ToolError::InputTooLarge {
                size,
                max: self.config.max_input_size,
            });
        }

        tool.call(&call.input, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainError, RejectionKind};
    use crate::models::{NativeTransferDescriptor, NativeToken, Prepared};
    use crate::ports::{ToolDefinition, ToolHandler};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn name(&self) -> &'static str { "echo" }
        fn definition(&self) -> ToolDefinition {
            ToolDefinition { name: "echo", description: "echo", input_schema: json!({}) }
        }
        async fn call(&self, input: &Value, ctx: &ToolContext) -> ToolResult<ToolResponse> {
            match input.get("mode").and_then(Value::as_str) {
                Some("reject") => Err(DomainError::NoNominationTargets.into()),
                Some("bad") => Err(ToolError::invalid_input("echo", "missing field `to`")),
                Some("tx") => Ok(Prepared::new(
                    NativeTransferDescriptor {
                        to: ctx.active_account.clone().unwrap_or_default(),
                        amount: "1".into(),
                        token: NativeToken::Dot,
                        sender_address: None,
                    },
                    "prepared",
                )
                .into()),
                _ => Ok(ToolResponse::message("hello")),
            }
        }
    }

    fn dispatcher(max_input_size: usize) -> ToolDispatcher {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        ToolDispatcher::new(Arc::new(registry), DispatcherConfig { max_input_size })
    }

    fn call(name: &str, input: Value) -> ToolCall {
        ToolCall { tool_name: name.into(), input }
    }

    #[tokio::test]
    async fn test_dispatch_success_paths() {
        let dispatcher = dispatcher(DEFAULT_MAX_INPUT_SIZE);
        let ctx = ToolContext::new("5Grw");

        let response = dispatcher.dispatch(&call("echo", json!({})), &ctx).await;
        assert_eq!(response.message, "hello");
        assert!(response.tx.is_none() && !response.is_rejected());

        let response = dispatcher.dispatch(&call("echo", json!({ "mode": "tx" })), &ctx).await;
        assert!(response.tx.is_some());
    }

    // Test critique: aucune erreur ne remonte, tout devient un message de rejet
    #[tokio::test]
    async fn test_dispatch_converts_errors() {
        let dispatcher = dispatcher(DEFAULT_MAX_INPUT_SIZE);
        let ctx = ToolContext::default();

        let response = dispatcher.dispatch(&call("swap", json!({})), &ctx).await;
        assert_eq!(response.rejection, Some(RejectionKind::UnknownTool));
        assert!(response.message.contains("swap"));

        let response = dispatcher.dispatch(&call("echo", json!({ "mode": "reject" })), &ctx).await;
        assert_eq!(response.rejection, Some(RejectionKind::CardinalityExceeded));
        assert_eq!(response.message, "Please provide at least one validator to nominate.");

        let response = dispatcher.dispatch(&call("echo", json!({ "mode": "bad" })), &ctx).await;
        assert_eq!(response.rejection, Some(RejectionKind::InvalidInput));
    }

    // Test critique: entrée trop volumineuse rejetée avant l'appel du tool
    #[tokio::test]
    async fn test_dispatch_rejects_oversized_input() {
        let dispatcher = dispatcher(32);
        let input = json!({ "mode": "tx", "padding": "x".repeat(64) });
        let response = dispatcher.dispatch(&call("echo", input), &ToolContext::default()).await;
        assert_eq!(response.rejection, Some(RejectionKind::InvalidInput));
        assert!(response.tx.is_none());
        assert!(response.message.contains("too large"));
    }
}
