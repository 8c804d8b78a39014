//! Tool bundle trait definition.

use std::sync::Arc;

use ferry_core::ports::ToolHandler;

/// A self-contained group of related tools.
///
/// Bundles provide a plugin-like architecture where each bundle can:
/// - Own the services its tools share (e.g. a route resolver)
/// - Register one or more tools
/// - Be independently developed and tested
///
/// # Example
///
/// ```ignore
/// pub struct MyBundle { /* ... */ }
///
/// impl ToolBundle for MyBundle {
///     fn name(&self) -> &'static str { "my_bundle" }
///
///     fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
///         vec![Arc::new(MyTool::new())]
///     }
/// }
/// ```
pub trait ToolBundle: Send + Sync {
    /// Unique name identifying this bundle.
    ///
    /// Used for logging.
    fn name(&self) -> &'static str;

    /// Returns all tools provided by this bundle.
    ///
    /// These tools will be registered with the dispatcher's ToolRegistry.
    fn tools(&self) -> Vec<Arc<dyn ToolHandler>>;

    /// Priority for bundle registration (higher = earlier in tool listings).
    ///
    /// Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}
