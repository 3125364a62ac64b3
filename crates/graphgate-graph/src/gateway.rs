//! The gateway: one connection, one graph, four operations.

use async_trait::async_trait;
use serde_json::Value;

use graphgate_core::{ConnectionConfig, ConnectionOptions, QueryOutput, SchemaSummary};

use crate::client::{Connector, GraphDatabase, GraphError, GraphHandle, QueryError};
use crate::falkor::{FalkorClient, FalkorConnector};
use crate::tools::{RunCypherQueryArgs, ToolError, ToolFlags, ToolName, ToolSpec, Toolkit};

pub const LABELS_QUERY: &str = "CALL db.labels()";
pub const RELATIONSHIP_TYPES_QUERY: &str = "CALL db.relationshipTypes()";

/// Query gateway bound to a single graph on a single connection.
///
/// The four public operations never fail: errors are logged and the caller
/// gets an empty result. Each has a `try_` twin that returns the error instead.
pub struct GraphGateway<D: GraphDatabase = FalkorClient> {
    config: ConnectionConfig,
    graph: D::Graph,
    tools: Vec<ToolName>,
}

impl GraphGateway<FalkorClient> {
    /// Resolve configuration and connect to FalkorDB.
    pub async fn connect(
        options: &ConnectionOptions,
        flags: ToolFlags,
    ) -> Result<Self, GraphError> {
        let config = ConnectionConfig::resolve(options).map_err(|e| {
            tracing::error!(error = %e, "Invalid FalkorDB configuration");
            GraphError::from(e)
        })?;
        Self::open(&FalkorConnector, config, flags).await
    }
}

impl<D: GraphDatabase> GraphGateway<D> {
    /// Connect through `connector` and select the configured graph.
    pub async fn open<C>(
        connector: &C,
        config: ConnectionConfig,
        flags: ToolFlags,
    ) -> Result<Self, GraphError>
    where
        C: Connector<Database = D>,
    {
        let database = match connector.connect(&config).await {
            Ok(database) => database,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    host = %config.host,
                    port = config.port,
                    "Failed to connect to FalkorDB"
                );
                return Err(e);
            }
        };

        let graph = database.select_graph(&config.graph_name);
        let tools = flags.enabled();
        tracing::debug!(graph = %config.graph_name, tools = ?tools, "FalkorDB gateway ready");

        Ok(Self {
            config,
            graph,
            tools,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn graph_name(&self) -> &str {
        self.graph.name()
    }

    /// Tools advertised to the host, in order.
    pub fn enabled_tools(&self) -> &[ToolName] {
        &self.tools
    }

    // ── Labels ──────────────────────────────────────────────────

    /// All node labels in the graph; empty on error.
    pub async fn list_labels(&self) -> Vec<String> {
        tracing::debug!(graph = %self.graph.name(), "Listing node labels");
        self.try_list_labels().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error listing labels");
            Vec::new()
        })
    }

    pub async fn try_list_labels(&self) -> Result<Vec<String>, QueryError> {
        let result = self.graph.query(LABELS_QUERY).await?;
        Ok(result.first_column_strings()?)
    }

    // ── Relationship types ──────────────────────────────────────

    /// All relationship types in the graph; empty on error.
    pub async fn list_relationship_types(&self) -> Vec<String> {
        tracing::debug!(graph = %self.graph.name(), "Listing relationship types");
        self.try_list_relationship_types().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error listing relationship types");
            Vec::new()
        })
    }

    pub async fn try_list_relationship_types(&self) -> Result<Vec<String>, QueryError> {
        let result = self.graph.query(RELATIONSHIP_TYPES_QUERY).await?;
        Ok(result.first_column_strings()?)
    }

    // ── Schema ──────────────────────────────────────────────────

    /// A one-element list holding labels and relationship types.
    ///
    /// A failure in either lookup fails the whole call, which then returns an
    /// empty list.
    pub async fn get_schema(&self) -> Vec<SchemaSummary> {
        tracing::debug!(graph = %self.graph.name(), "Retrieving FalkorDB schema");
        match self.try_get_schema().await {
            Ok(schema) => vec![schema],
            Err(e) => {
                tracing::error!(error = %e, "Error getting FalkorDB schema");
                Vec::new()
            }
        }
    }

    pub async fn try_get_schema(&self) -> Result<SchemaSummary, QueryError> {
        let labels = self.try_list_labels().await?;
        let relationship_types = self.try_list_relationship_types().await?;
        Ok(SchemaSummary {
            labels,
            relationship_types,
        })
    }

    // ── Cypher ──────────────────────────────────────────────────

    /// Run `query` verbatim against the selected graph.
    ///
    /// Rows come back as records keyed by column when the result has a header,
    /// and unchanged otherwise. Empty on error, including a row whose length
    /// does not match the header.
    pub async fn run_cypher_query(&self, query: &str) -> QueryOutput {
        tracing::debug!(graph = %self.graph.name(), query, "Running Cypher query");
        self.try_run_cypher_query(query).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Error running Cypher query");
            QueryOutput::empty()
        })
    }

    pub async fn try_run_cypher_query(&self, query: &str) -> Result<QueryOutput, QueryError> {
        let result = self.graph.query(query).await?;
        Ok(result.into_output()?)
    }
}

#[async_trait]
impl<D: GraphDatabase> Toolkit for GraphGateway<D> {
    fn name(&self) -> &str {
        crate::tools::TOOLKIT_NAME
    }

    fn tools(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(ToolName::spec).collect()
    }

    async fn call(&self, tool: &str, args: Value) -> Result<Value, ToolError> {
        let name: ToolName = tool.parse()?;
        if !self.tools.contains(&name) {
            return Err(ToolError::NotEnabled(name.to_string()));
        }

        let output = match name {
            ToolName::ListLabels => serde_json::to_value(self.list_labels().await)?,
            ToolName::ListRelationshipTypes => {
                serde_json::to_value(self.list_relationship_types().await)?
            }
            ToolName::GetSchema => serde_json::to_value(self.get_schema().await)?,
            ToolName::RunCypherQuery => {
                let args: RunCypherQueryArgs =
                    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
                        tool: name.to_string(),
                        reason: e.to_string(),
                    })?;
                serde_json::to_value(self.run_cypher_query(&args.query).await)?
            }
        };
        Ok(output)
    }
}
