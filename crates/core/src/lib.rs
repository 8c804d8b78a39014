//! Core domain layer for Ferry.
//!
//! This crate contains the domain models, port traits (interfaces), and
//! validation services of the conversational wallet core. It follows
//! hexagonal architecture principles - this is the innermost layer with
//! no dependencies on infrastructure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ferry (binary)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │   ferry-graphql   │    ferry-tools     │  ferry-substrate   │
//! │      (API)        │    (bundles)       │  (oracle, RPC)     │
//! ├───────────────────┴────────────────────┴────────────────────┤
//! │                      ferry-core  ← YOU ARE HERE             │
//! │               (models, ports, services)                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Tokens, topology, amounts, addresses, requests, descriptors
//! - [`ports`] - Interface traits for adapters to implement
//! - [`services`] - Route resolver, staking validators, tool dispatcher
//! - [`error`] - Rejection taxonomy and error types
//! - [`metrics`] - Prometheus metrics definitions
//!
//! # Key Concepts
//!
//! ## Ports
//!
//! - [`ports::CapabilityOracle`] - Ask live chains whether an asset moves on a route
//! - [`ports::ToolHandler`] - One declared tool callable by the orchestration loop
//!
//! ## Call Lifecycle
//!
//! 1. The orchestration loop picks a tool and sends `{toolName, input}`
//! 2. The dispatcher looks the tool up and bounds the input size
//! 3. The tool parses the input into a typed request (ingress validation)
//! 4. A service checks domain legality and prepares a descriptor
//! 5. The response `{tx?, message, rejection?}` goes back; nothing is submitted

pub mod error;
pub mod metrics;
pub mod models;
pub mod ports;
pub mod services;
