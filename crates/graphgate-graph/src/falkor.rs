//! FalkorDB connection management over the Redis protocol.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{ConnectionAddr, ConnectionInfo, RedisConnectionInfo, Value};
use tokio::sync::RwLock;

use graphgate_core::{ConnectionConfig, QueryResult};

use crate::client::{Connector, GraphDatabase, GraphError, GraphHandle, QueryError};
use crate::decode::{self, Catalog, DecodeError};
use crate::gateway::{LABELS_QUERY, RELATIONSHIP_TYPES_QUERY};

pub const PROPERTY_KEYS_QUERY: &str = "CALL db.propertyKeys()";

/// Connects to FalkorDB with a [`ConnectionConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FalkorConnector;

#[async_trait]
impl Connector for FalkorConnector {
    type Database = FalkorClient;

    async fn connect(&self, config: &ConnectionConfig) -> Result<FalkorClient, GraphError> {
        FalkorClient::connect(config).await
    }
}

/// An open FalkorDB connection.
///
/// The underlying multiplexed connection pipelines concurrent commands over a
/// single socket, so clones and graph handles share it safely. A dropped
/// connection is not re-established; it surfaces as a query error.
#[derive(Clone)]
pub struct FalkorClient {
    conn: MultiplexedConnection,
    query_timeout_ms: Option<u64>,
}

impl FalkorClient {
    /// Connect and authenticate, bounded by `connect_timeout_ms`.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, GraphError> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
            redis: RedisConnectionInfo {
                db: 0,
                username: config.username.clone(),
                password: config.password.clone(),
                ..Default::default()
            },
        };

        let client =
            redis::Client::open(info).map_err(|e| GraphError::Connection(e.to_string()))?;

        let conn = tokio::time::timeout(
            Duration::from_millis(config.connect_timeout_ms),
            client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| GraphError::ConnectTimeout {
            millis: config.connect_timeout_ms,
        })?
        .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(
            host = %config.host,
            port = config.port,
            graph = %config.graph_name,
            "Connected to FalkorDB"
        );
        Ok(Self {
            conn,
            query_timeout_ms: config.query_timeout_ms,
        })
    }
}

impl GraphDatabase for FalkorClient {
    type Graph = FalkorGraph;

    fn select_graph(&self, name: &str) -> FalkorGraph {
        FalkorGraph {
            conn: self.conn.clone(),
            name: name.to_string(),
            query_timeout_ms: self.query_timeout_ms,
            catalog: Arc::default(),
        }
    }
}

/// One named graph on a [`FalkorClient`] connection.
///
/// Queries run in compact mode. The label, relationship type and property
/// key names behind the reply's ids are cached per graph and reloaded when a
/// reply mentions an id the cache does not know.
#[derive(Clone)]
pub struct FalkorGraph {
    conn: MultiplexedConnection,
    name: String,
    query_timeout_ms: Option<u64>,
    catalog: Arc<RwLock<Catalog>>,
}

impl FalkorGraph {
    async fn send(&self, cypher: &str) -> Result<Value, QueryError> {
        let mut conn = self.conn.clone();
        let mut cmd = redis::cmd("GRAPH.QUERY");
        cmd.arg(&self.name).arg(cypher).arg("--compact");

        let reply: Value = match self.query_timeout_ms {
            Some(millis) => tokio::time::timeout(
                Duration::from_millis(millis),
                cmd.query_async(&mut conn),
            )
            .await
            .map_err(|_| QueryError::Timeout { millis })??,
            None => cmd.query_async(&mut conn).await?,
        };
        Ok(reply)
    }

    async fn refresh_catalog(&self) -> Result<Catalog, QueryError> {
        let catalog = Catalog {
            labels: self.names(LABELS_QUERY).await?,
            relationship_types: self.names(RELATIONSHIP_TYPES_QUERY).await?,
            property_keys: self.names(PROPERTY_KEYS_QUERY).await?,
        };
        *self.catalog.write().await = catalog.clone();
        Ok(catalog)
    }

    // Procedure replies hold plain strings, so no catalog is needed.
    async fn names(&self, procedure: &str) -> Result<Vec<String>, QueryError> {
        let reply = self.send(procedure).await?;
        let result = decode::query_reply(&reply, &Catalog::default())?;
        Ok(result.first_column_strings()?)
    }
}

#[async_trait]
impl GraphHandle for FalkorGraph {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, cypher: &str) -> Result<QueryResult, QueryError> {
        let reply = self.send(cypher).await?;

        let decoded = {
            let catalog = self.catalog.read().await;
            decode::query_reply(&reply, &catalog)
        };
        match decoded {
            Err(DecodeError::UnknownId { kind, id }) => {
                tracing::debug!(graph = %self.name, %kind, id, "Reloading FalkorDB schema ids");
                let catalog = self.refresh_catalog().await?;
                Ok(decode::query_reply(&reply, &catalog)?)
            }
            decoded => Ok(decoded?),
        }
    }
}
