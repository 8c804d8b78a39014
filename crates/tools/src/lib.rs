//! Tool bundles for Ferry.
//!
//! This crate provides the tools the orchestration loop can call. Each
//! bundle is self-contained with its own:
//!
//! - Tool handlers (input parsing, JSON schema, description)
//! - Shared services (e.g. the route resolver for XCM tools)
//!
//! # Creating a Custom Bundle
//!
//! ```ignore
//! use ferry_tools::{ToolBundle, BundleRegistry};
//!
//! pub struct GovernanceBundle;
//!
//! impl ToolBundle for GovernanceBundle {
//!     fn name(&self) -> &'static str {
//!         "governance"
//!     }
//!
//!     fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
//!         vec![Arc::new(VoteTool)]
//!     }
//! }
//! ```
//!
//! # Registering Bundles
//!
//! ```ignore
//! let mut registry = standard_bundles(resolver.clone());
//! registry.register(Box::new(GovernanceBundle));
//!
//! // Get unified tool registry
//! let tools = registry.into_tool_registry();
//! ```

pub mod pools;
pub mod staking;
pub mod transfer;
pub mod utils;
pub mod xcm;

mod bundle;
mod registry;

use std::sync::Arc;

use ferry_core::services::RouteResolver;

pub use bundle::ToolBundle;
pub use registry::BundleRegistry;

pub use pools::PoolsBundle;
pub use staking::StakingBundle;
pub use transfer::TransferBundle;
pub use xcm::XcmBundle;

/// Registry pre-loaded with every built-in bundle.
pub fn standard_bundles(resolver: Arc<RouteResolver>) -> BundleRegistry {
    let mut registry = BundleRegistry::new();
    registry.register(Box::new(XcmBundle::new(resolver)));
    registry.register(Box::new(TransferBundle));
    registry.register(Box::new(StakingBundle));
    registry.register(Box::new(PoolsBundle));
    registry
}
