//! Cross-chain bundle: teleports, stablecoin transfers and topology listings.

mod listing;
mod stablecoin;
mod teleport;

pub use listing::*;
pub use stablecoin::*;
pub use teleport::*;

use std::sync::Arc;

use ferry_core::ports::ToolHandler;
use ferry_core::services::RouteResolver;

use crate::bundle::ToolBundle;

/// Every tool that goes through the route resolver.
pub struct XcmBundle {
    resolver: Arc<RouteResolver>,
}

impl XcmBundle {
    pub fn new(resolver: Arc<RouteResolver>) -> Self {
        Self { resolver }
    }
}

impl ToolBundle for XcmBundle {
    fn name(&self) -> &'static str {
        "xcm"
    }

    fn tools(&self) -> Vec<Arc<dyn ToolHandler>> {
        vec![
            Arc::new(XcmTransferTool::new(self.resolver.clone())),
            Arc::new(StablecoinTransferTool::new(self.resolver.clone())),
            Arc::new(RelayChainsTool::new(self.resolver.clone())),
            Arc::new(SystemChainsTool::new(self.resolver.clone())),
        ]
    }

    fn priority(&self) -> i32 {
        100
    }
}
