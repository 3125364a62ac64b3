//! Client interface the gateway is written against, and its error types.

use async_trait::async_trait;

use graphgate_core::{ConnectionConfig, CoreError, ProjectionError, QueryResult};

/// Errors raised while constructing a gateway. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error(transparent)]
    Config(#[from] CoreError),

    #[error("FalkorDB connection error: {0}")]
    Connection(String),

    #[error("FalkorDB connection timed out after {millis}ms")]
    ConnectTimeout { millis: u64 },
}

/// Errors from a single query round trip.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("FalkorDB query error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Query timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Unexpected reply from FalkorDB: {0}")]
    Decode(String),

    #[error("Result shape error: {0}")]
    Projection(#[from] ProjectionError),

    #[error("Query failed: {0}")]
    Backend(String),
}

/// Opens a connection to a graph database endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    type Database: GraphDatabase;

    async fn connect(&self, config: &ConnectionConfig) -> Result<Self::Database, GraphError>;
}

/// A live connection that can hand out handles scoped to one graph.
pub trait GraphDatabase: Send + Sync {
    type Graph: GraphHandle;

    fn select_graph(&self, name: &str) -> Self::Graph;
}

/// A single named graph on an open connection.
#[async_trait]
pub trait GraphHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Run `cypher` verbatim and return the raw header and rows.
    async fn query(&self, cypher: &str) -> Result<QueryResult, QueryError>;
}
