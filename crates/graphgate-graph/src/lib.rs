//! graphgate-graph — FalkorDB gateway for agent tool calls.
//!
//! [`GraphGateway`] owns one connection and one selected graph, and exposes
//! four operations: list labels, list relationship types, summarize the schema,
//! and run an arbitrary Cypher query. Construction failures are errors; call
//! failures are logged and degrade to an empty result.
//!
//! The database client sits behind the [`Connector`] / [`GraphDatabase`] /
//! [`GraphHandle`] traits so the gateway can run against an in-memory fake.

pub mod client;
pub mod decode;
pub mod falkor;
pub mod gateway;
pub mod tools;

pub use client::{Connector, GraphDatabase, GraphError, GraphHandle, QueryError};
pub use falkor::{FalkorClient, FalkorConnector, FalkorGraph};
pub use gateway::GraphGateway;
pub use tools::{ToolError, ToolFlags, ToolName, ToolSpec, Toolkit, TOOLKIT_NAME};
