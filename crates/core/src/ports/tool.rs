//! Port trait for declared tools.
//!
//! This is the main extensibility point of the dispatcher. Each operation the
//! orchestration loop may call implements [`ToolHandler`] and is registered in
//! a [`ToolRegistry`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolResult;
use crate::models::ToolResponse;

/// Declared contract of a tool, as advertised to the orchestration loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the `input` object.
    pub input_schema: serde_json::Value,
}

/// Session state passed explicitly into every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolContext {
    /// Account currently selected in the wallet.
    pub active_account: Option<String>,
    /// Network currently selected ("Polkadot", "Westend", ...).
    pub active_chain: Option<String>,
}

impl ToolContext {
    pub fn new(active_account: impl Into<String>) -> Self {
        Self {
            active_account: Some(active_account.into()),
            active_chain: None,
        }
    }

    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.active_chain = Some(chain.into());
        self
    }
}

/// A tool-call record from the orchestration loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub input: serde_json::Value,
}

/// Estimate the serialized size of a JSON value in bytes.
pub fn estimate_json_size(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Null => 4,
        serde_json::Value::Bool(_) => 5,
        serde_json::Value::Number(n) => n.to_string().len(),
        serde_json::Value::String(s) => s.len() + 2, // quotes
        serde_json::Value::Array(arr) => {
            2 + arr.iter().map(estimate_json_size).sum::<usize>() + arr.len().saturating_sub(1) // commas
        }
        serde_json::Value::Object(obj) => {
            2 + obj
                .iter()
                .map(|(k, v)| k.len() + 3 + estimate_json_size(v)) // key + quotes + colon
                .sum::<usize>()
                + obj.len().saturating_sub(1) // commas
        }
    }
}

/// Trait for declared tools.
///
/// `call` parses `input` into a typed request, runs the matching service and
/// returns its response. Rejections are returned as `Err` and turned into a
/// message by the dispatcher.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Tool name as called by the orchestration loop (e.g., "xcmTransfer").
    fn name(&self) -> &'static str;

    /// Name, description and input schema.
    fn definition(&self) -> ToolDefinition;

    /// Execute one call.
    async fn call(&self, input: &serde_json::Value, ctx: &ToolContext) -> ToolResult<ToolResponse>;

    /// Listing order (higher = earlier). Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}

/// Registry for declared tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolHandler>>,
    ordered_tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            ordered_tools: Vec::new(),
        }
    }

    /// Register a tool. A later registration under the same name replaces the earlier one.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        let name = tool.name().to_string();
        if self.tools.insert(name, tool.clone()).is_some() {
            self.ordered_tools.retain(|t| t.name() != tool.name());
        }
        self.ordered_tools.push(tool);
        // Stable sort keeps registration order within a priority
        self.ordered_tools
            .sort_by_key(|t| std::cmp::Reverse(t.priority()));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.get(name)
    }

    /// All tools in priority order.
    pub fn all(&self) -> &[Arc<dyn ToolHandler>] {
        &self.ordered_tools
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<&'static str> {
        self.ordered_tools.iter().map(|t| t.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.ordered_tools.iter().map(|t| t.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.ordered_tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct MockTool(&'static str, i32);

    #[async_trait]
    impl ToolHandler for MockTool {
        fn name(&self) -> &'static str { self.0 }
        fn priority(&self) -> i32 { self.1 }
        fn definition(&self) -> ToolDefinition {
            ToolDefinition { name: self.0, description: "mock", input_schema: json!({}) }
        }
        async fn call(&self, _: &serde_json::Value, _: &ToolContext) -> ToolResult<ToolResponse> {
            Ok(ToolResponse::message(self.0))
        }
    }

    // Test critique: les tools sont triés par priorité (décroissante)
    #[test]
    fn test_tool_registry_priority_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool("Low", -10)));
        registry.register(Arc::new(MockTool("High", 100)));
        registry.register(Arc::new(MockTool("Medium", 50)));

        // Ordre décroissant par priorité
        assert_eq!(registry.tool_names(), vec!["High", "Medium", "Low"]);
        assert!(registry.has_tool("Medium"));
        assert!(!registry.has_tool("medium"));
    }

    // Test critique: un doublon remplace l'ancien sans le lister deux fois
    #[test]
    fn test_tool_registry_replaces_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool("bond", 0)));
        registry.register(Arc::new(MockTool("bond", 5)));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("bond").unwrap().priority(), 5);
    }

    #[test]
    fn test_estimate_json_size_matches_serialized_len() {
        let value = json!({ "to": "5Grw", "amount": 12, "tags": ["a", "b"], "memo": null });
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(estimate_json_size(&value), serialized.len());
    }

    #[test]
    fn test_tool_context_deserializes_camel_case() {
        let ctx: ToolContext =
            serde_json::from_value(json!({ "activeAccount": "5Grw", "activeChain": "Paseo" }))
                .unwrap();
        assert_eq!(ctx, ToolContext::new("5Grw").with_chain("Paseo"));
        let empty: ToolContext = serde_json::from_value(json!({})).unwrap();
        assert!(empty.active_account.is_none());
    }
}
