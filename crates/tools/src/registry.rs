//! Bundle registry for managing tool bundles.

use std::cmp::Reverse;

use tracing::{debug, info, warn};

use ferry_core::ports::ToolRegistry;

use crate::bundle::ToolBundle;

/// Registry for managing tool bundles.
///
/// # Example
///
/// ```ignore
/// let mut registry = BundleRegistry::new();
///
/// // Register bundles (order doesn't matter - priority determines listing order)
/// registry.register(Box::new(XcmBundle::new(resolver.clone())));
/// registry.register(Box::new(StakingBundle));
///
/// // Convert to ToolRegistry for the dispatcher
/// let tools = registry.into_tool_registry();
/// ```
pub struct BundleRegistry {
    bundles: Vec<Box<dyn ToolBundle>>,
}

impl BundleRegistry {
    /// Create a new empty bundle registry.
    pub fn new() -> Self {
        Self {
            bundles: Vec::new(),
        }
    }

    /// Register a tool bundle.
    pub fn register(&mut self, bundle: Box<dyn ToolBundle>) {
        info!(bundle = bundle.name(), "📦 Registering tool bundle");
        self.bundles.push(bundle);
    }

    /// Convert this registry into a ToolRegistry.
    ///
    /// This extracts all tools from all bundles, in bundle priority order.
    /// The BundleRegistry is consumed.
    pub fn into_tool_registry(self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();

        let mut sorted = self.bundles;
        sorted.sort_by_key(|b| Reverse(b.priority()));

        for bundle in sorted {
            let tools = bundle.tools();
            debug!(bundle = bundle.name(), tools = tools.len(), "Extracting tools");

            for tool in tools {
                if registry.has_tool(tool.name()) {
                    warn!(
                        bundle = bundle.name(),
                        tool = tool.name(),
                        "⚠️  Tool name already registered, replacing"
                    );
                }
                registry.register(tool);
            }
        }

        registry
    }

    /// Get the names of all registered bundles.
    pub fn bundle_names(&self) -> Vec<&'static str> {
        self.bundles.iter().map(|b| b.name()).collect()
    }

    /// Get the number of registered bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Check if no bundles are registered.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl Default for BundleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use ferry_core::error::ToolResult;
    use ferry_core::models::ToolResponse;
    use ferry_core::ports::{ToolContext, ToolDefinition, ToolHandler};
    use serde_json::{Value, json};

    struct MockTool(&'static str);

    #[async_trait]
    impl ToolHandler for MockTool {
        fn name(&self) -> &'static str { self.0 }
        fn definition(&self) -> ToolDefinition {
            ToolDefinition { name: self.0, description: "mock", input_schema: json!({}) }
        }
        async fn call(&self, _: &Value, _: &ToolContext) -> ToolResult<ToolResponse> {
            Ok(ToolResponse::message(self.0))
        }
    }

    struct MockBundle {
        name: &'static str,
        priority: i32,
        tools: Vec<&'static str>,
    }

    impl ToolBundle for MockBundle {
        fn name(&self) -> &'static str { self.name }
        fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
            self.tools.iter().map(|t| Arc::new(MockTool(*t)) as Arc<dyn ToolHandler>).collect()
        }
        fn priority(&self) -> i32 { self.priority }
    }

    // Test critique: les tools sont extraits dans l'ordre de priorité des bundles
    #[test]
    fn test_bundle_to_tool_registry_extraction() {
        let mut registry = BundleRegistry::new();

        registry.register(Box::new(MockBundle {
            name: "low_priority",
            priority: 0,
            tools: vec!["bond", "unbond"],
        }));
        registry.register(Box::new(MockBundle {
            name: "high_priority",
            priority: 100,
            tools: vec!["xcmTransfer"],
        }));
        assert_eq!(registry.bundle_names(), vec!["low_priority", "high_priority"]);

        let tools = registry.into_tool_registry();

        // Tous les tools doivent être présents, bundle prioritaire en tête
        assert_eq!(tools.tool_names(), vec!["xcmTransfer", "bond", "unbond"]);
    }
}
