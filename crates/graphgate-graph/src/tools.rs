//! Tool registration surface for agent hosts.
//!
//! A host discovers tools through [`Toolkit::tools`] and invokes them by name
//! with JSON arguments through [`Toolkit::call`]. Only enabled tools are
//! advertised or dispatchable here; the gateway's own methods stay callable
//! directly either way.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Symbolic name the toolkit registers under.
pub const TOOLKIT_NAME: &str = "falkordb_tools";

/// Errors from dispatching a tool call by name.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Tool '{0}' is not enabled in this toolkit")]
    NotEnabled(String),

    #[error("Invalid arguments for '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The four gateway operations, in advertisement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    ListLabels,
    ListRelationshipTypes,
    GetSchema,
    RunCypherQuery,
}

impl ToolName {
    pub const ALL: [ToolName; 4] = [
        ToolName::ListLabels,
        ToolName::ListRelationshipTypes,
        ToolName::GetSchema,
        ToolName::RunCypherQuery,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListLabels => "list_labels",
            Self::ListRelationshipTypes => "list_relationship_types",
            Self::GetSchema => "get_schema",
            Self::RunCypherQuery => "run_cypher_query",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ListLabels => {
                "Retrieve all node labels present in the connected FalkorDB database."
            }
            Self::ListRelationshipTypes => {
                "Retrieve all relationship types present in the connected FalkorDB database."
            }
            Self::GetSchema => {
                "Retrieve the database schema: all node labels and relationship types."
            }
            Self::RunCypherQuery => {
                "Execute an arbitrary Cypher query against the connected FalkorDB database."
            }
        }
    }

    /// JSON Schema for the tool's arguments.
    pub fn parameters(&self) -> Value {
        match self {
            Self::RunCypherQuery => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The Cypher query string to execute."
                    }
                },
                "required": ["query"]
            }),
            _ => json!({ "type": "object", "properties": {} }),
        }
    }

    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| ToolError::UnknownTool(s.to_string()))
    }
}

/// A tool as advertised to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Which operations to advertise. A tool is enabled when `all` or its own flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolFlags {
    pub list_labels: bool,
    pub list_relationships: bool,
    pub get_schema: bool,
    pub run_cypher_query: bool,
    pub all: bool,
}

impl Default for ToolFlags {
    fn default() -> Self {
        Self {
            list_labels: true,
            list_relationships: true,
            get_schema: true,
            run_cypher_query: true,
            all: false,
        }
    }
}

impl ToolFlags {
    /// Every individual flag off; advertises nothing.
    pub fn none() -> Self {
        Self {
            list_labels: false,
            list_relationships: false,
            get_schema: false,
            run_cypher_query: false,
            all: false,
        }
    }

    /// Enable only the listed tools.
    pub fn only(tools: &[ToolName]) -> Self {
        tools.iter().fold(Self::none(), |flags, tool| flags.with(*tool, true))
    }

    pub fn with(mut self, tool: ToolName, enabled: bool) -> Self {
        match tool {
            ToolName::ListLabels => self.list_labels = enabled,
            ToolName::ListRelationshipTypes => self.list_relationships = enabled,
            ToolName::GetSchema => self.get_schema = enabled,
            ToolName::RunCypherQuery => self.run_cypher_query = enabled,
        }
        self
    }

    pub fn with_all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn is_enabled(&self, tool: ToolName) -> bool {
        self.all
            || match tool {
                ToolName::ListLabels => self.list_labels,
                ToolName::ListRelationshipTypes => self.list_relationships,
                ToolName::GetSchema => self.get_schema,
                ToolName::RunCypherQuery => self.run_cypher_query,
            }
    }

    /// Enabled tools in advertisement order.
    pub fn enabled(&self) -> Vec<ToolName> {
        ToolName::ALL
            .into_iter()
            .filter(|tool| self.is_enabled(*tool))
            .collect()
    }
}

/// A named bundle of callable tools, as seen by an agent host.
#[async_trait]
pub trait Toolkit: Send + Sync {
    fn name(&self) -> &str;

    /// Advertised tools only.
    fn tools(&self) -> Vec<ToolSpec>;

    /// Invoke an advertised tool with JSON arguments.
    async fn call(&self, tool: &str, args: Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunCypherQueryArgs {
    pub query: String,
}
