//! Result shapes returned by the graph database and handed back to tool callers.
//!
//! A raw [`QueryResult`] is a header (optional) plus rows of JSON cell values.
//! The gateway never hands a `QueryResult` out as-is; it projects it into one of:
//! - a flat list of strings (column 0 of every row), for label/type enumeration
//! - a list of [`Record`]s keyed by header name, when a header is present
//! - the raw rows, when there is no header

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProjectionError;

/// One result row keyed by column name, in header order.
pub type Record = serde_json::Map<String, Value>;

/// A single positional result row.
pub type Row = Vec<Value>;

/// Raw result of one query round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Ordered column names; `None` when the statement projects nothing.
    pub header: Option<Vec<String>>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(header: Option<Vec<String>>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// A result with rows but no header.
    pub fn headerless(rows: Vec<Row>) -> Self {
        Self { header: None, rows }
    }

    /// The header, if present and non-empty.
    pub fn columns(&self) -> Option<&[String]> {
        self.header.as_deref().filter(|h| !h.is_empty())
    }

    /// Column 0 of every row, in row order. Every cell must be a string.
    pub fn first_column_strings(&self) -> Result<Vec<String>, ProjectionError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(row, values)| match values.first() {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(ProjectionError::NotAString {
                    row,
                    value: other.clone(),
                }),
                None => Err(ProjectionError::MissingColumn { row }),
            })
            .collect()
    }

    /// Project into keyed records when a header is present, raw rows otherwise.
    ///
    /// Each row must have exactly as many values as the header has columns.
    /// Duplicate column names keep the last value, in the first name's position.
    pub fn into_output(self) -> Result<QueryOutput, ProjectionError> {
        if self.columns().is_none() {
            return Ok(QueryOutput::Rows(self.rows));
        }
        let header = self.header.unwrap_or_default();

        let mut records = Vec::with_capacity(self.rows.len());
        for (row, values) in self.rows.into_iter().enumerate() {
            if values.len() != header.len() {
                return Err(ProjectionError::RowShape {
                    row,
                    expected: header.len(),
                    found: values.len(),
                });
            }
            let record: Record = header.iter().cloned().zip(values).collect();
            records.push(record);
        }
        Ok(QueryOutput::Records(records))
    }
}

/// What `run_cypher_query` hands back to its caller.
///
/// Serializes as a bare JSON array either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Records(Vec<Record>),
    Rows(Vec<Row>),
}

impl QueryOutput {
    pub fn empty() -> Self {
        Self::Rows(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Records(r) => r.len(),
            Self::Rows(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryOutput {
    fn default() -> Self {
        Self::empty()
    }
}

/// Node labels and relationship types present in the selected graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub labels: Vec<String>,
    #[serde(rename = "relationshipTypes")]
    pub relationship_types: Vec<String>,
}
