//! GraphQL API for Ferry.
//!
//! Provides a GraphQL endpoint to list tools and chains and to dispatch
//! tool calls.
//!
//! # Operations
//!
//! - `tools` - declared tools with their input JSON schema
//! - `relayChains`, `systemChains(symbol)` - chain topology
//! - `callTool(name, input, context)` - run a tool, returns
//!   `{success, message, call, tx, rejection}`
//!
//! # Building the Schema
//!
//! ```ignore
//! use ferry_graphql::{build_schema, serve_with_shutdown, ServerConfig};
//!
//! let schema = build_schema(dispatcher, topology);
//! serve_with_shutdown(schema, ServerConfig::default(), shutdown_signal()).await?;
//! ```

mod schema;
mod server;
mod types;

pub use schema::{MAX_QUERY_COMPLEXITY, MAX_QUERY_DEPTH, MutationRoot, QueryRoot, build_schema};
pub use server::{ServerConfig, router, serve, serve_with_shutdown};
pub use types::{CallToolResult, FerrySchema, RelayChain, SystemChain, Tool, ToolContextInput};
