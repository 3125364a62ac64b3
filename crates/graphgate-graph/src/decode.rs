//! Decoding of compact `GRAPH.QUERY` replies into [`QueryResult`].
//!
//! A reply is an array of sections:
//! - `[header, rows, stats]` when the statement returns columns
//! - `[stats]` for statements that return nothing (CREATE, DELETE, ...)
//!
//! Header entries are `[column type, name]` pairs; plain names are accepted
//! too. Every cell is a `[value type, value]` pair. Scalars map onto the
//! matching JSON type. Nodes, edges and paths become objects, with label,
//! relationship type and property key ids resolved through a [`Catalog`].

use std::fmt;

use redis::Value;
use serde_json::{Map, Value as Json};

use graphgate_core::QueryResult;

use crate::client::QueryError;

const NULL: i64 = 1;
const STRING: i64 = 2;
const INTEGER: i64 = 3;
const BOOLEAN: i64 = 4;
const DOUBLE: i64 = 5;
const ARRAY: i64 = 6;
const EDGE: i64 = 7;
const NODE: i64 = 8;
const PATH: i64 = 9;
const MAP: i64 = 10;
const POINT: i64 = 11;
const VECTORF32: i64 = 12;

/// Names behind the numeric ids used in compact replies, in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub labels: Vec<String>,
    pub relationship_types: Vec<String>,
    pub property_keys: Vec<String>,
}

impl Catalog {
    fn resolve(&self, kind: IdKind, id: i64) -> Result<&str, DecodeError> {
        let names = match kind {
            IdKind::Label => &self.labels,
            IdKind::RelationshipType => &self.relationship_types,
            IdKind::PropertyKey => &self.property_keys,
        };
        usize::try_from(id)
            .ok()
            .and_then(|index| names.get(index))
            .map(String::as_str)
            .ok_or(DecodeError::UnknownId { kind, id })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Label,
    RelationshipType,
    PropertyKey,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Label => "label",
            IdKind::RelationshipType => "relationship type",
            IdKind::PropertyKey => "property key",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("{0}")]
    Malformed(String),

    /// The catalog is stale; refresh it and decode again.
    #[error("unknown {kind} id {id}")]
    UnknownId { kind: IdKind, id: i64 },
}

impl From<DecodeError> for QueryError {
    fn from(e: DecodeError) -> Self {
        QueryError::Decode(e.to_string())
    }
}

fn malformed(what: &str, value: &Value) -> DecodeError {
    DecodeError::Malformed(format!("{what}: {value:?}"))
}

/// Decode a full `GRAPH.QUERY` reply.
pub fn query_reply(reply: &Value, catalog: &Catalog) -> Result<QueryResult, DecodeError> {
    let sections = items(reply, "expected an array reply")?;

    match sections {
        [_stats] => Ok(QueryResult::default()),
        [header, rows, _stats] => Ok(QueryResult::new(
            Some(decode_header(header)?),
            decode_rows(rows, catalog)?,
        )),
        _ => Err(DecodeError::Malformed(format!(
            "expected 1 or 3 reply sections, got {}",
            sections.len()
        ))),
    }
}

fn decode_header(section: &Value) -> Result<Vec<String>, DecodeError> {
    items(section, "header is not an array")?
        .iter()
        .map(column_name)
        .collect()
}

fn column_name(column: &Value) -> Result<String, DecodeError> {
    match column {
        // [column type, name]
        Value::Bulk(pair) if pair.len() == 2 => column_name(&pair[1]),
        other => text(other).map_err(|_| malformed("unrecognized header entry", other)),
    }
}

fn decode_rows(section: &Value, catalog: &Catalog) -> Result<Vec<Vec<Json>>, DecodeError> {
    items(section, "result set is not an array")?
        .iter()
        .map(|row| -> Result<Vec<Json>, DecodeError> {
            items(row, "row is not an array")?
                .iter()
                .map(|cell| typed_cell(cell, catalog))
                .collect()
        })
        .collect()
}

/// Decode one `[value type, value]` cell.
fn typed_cell(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let [kind, value] = fields::<2>(value, "typed value")?;
    scalar(int(kind, "value type")?, value, catalog)
}

fn scalar(kind: i64, value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    match kind {
        NULL => Ok(Json::Null),
        STRING => text(value).map(Json::String),
        INTEGER => int(value, "integer").map(Json::from),
        BOOLEAN => match text(value)?.as_str() {
            "true" => Ok(Json::Bool(true)),
            "false" => Ok(Json::Bool(false)),
            _ => Err(malformed("boolean", value)),
        },
        DOUBLE => double(value),
        ARRAY => items(value, "array")?
            .iter()
            .map(|item| typed_cell(item, catalog))
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        EDGE => edge(value, catalog),
        NODE => node(value, catalog),
        PATH => path(value, catalog),
        MAP => map(value, catalog),
        POINT => {
            let [latitude, longitude] = fields::<2>(value, "point")?;
            let mut object = Map::new();
            object.insert("latitude".into(), double(latitude)?);
            object.insert("longitude".into(), double(longitude)?);
            Ok(Json::Object(object))
        }
        VECTORF32 => items(value, "vector")?
            .iter()
            .map(double)
            .collect::<Result<Vec<_>, _>>()
            .map(Json::Array),
        other => Err(DecodeError::Malformed(format!("unknown value type {other}"))),
    }
}

// [id, [label ids], [properties]]
fn node(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let [id, labels, props] = fields::<3>(value, "node")?;
    let labels = items(labels, "node labels")?
        .iter()
        .map(|label| {
            let label = catalog.resolve(IdKind::Label, int(label, "label id")?)?;
            Ok(Json::from(label))
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    let mut object = Map::new();
    object.insert("id".into(), int(id, "node id")?.into());
    object.insert("labels".into(), Json::Array(labels));
    object.insert("properties".into(), properties(props, catalog)?);
    Ok(Json::Object(object))
}

// [id, relationship type id, source id, destination id, [properties]]
fn edge(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let [id, relation, src, dest, props] = fields::<5>(value, "edge")?;
    let relation = catalog.resolve(
        IdKind::RelationshipType,
        int(relation, "relationship type id")?,
    )?;

    let mut object = Map::new();
    object.insert("id".into(), int(id, "edge id")?.into());
    object.insert("type".into(), relation.into());
    object.insert("src_node".into(), int(src, "source node id")?.into());
    object.insert("dest_node".into(), int(dest, "destination node id")?.into());
    object.insert("properties".into(), properties(props, catalog)?);
    Ok(Json::Object(object))
}

// [[ARRAY, nodes], [ARRAY, edges]]
fn path(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let [nodes, edges] = fields::<2>(value, "path")?;
    let mut object = Map::new();
    object.insert("nodes".into(), typed_cell(nodes, catalog)?);
    object.insert("edges".into(), typed_cell(edges, catalog)?);
    Ok(Json::Object(object))
}

// [key, [type, value], key, [type, value], ...]
fn map(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let entries = items(value, "map")?;
    if entries.len() % 2 != 0 {
        return Err(malformed("map with a dangling key", value));
    }
    let mut object = Map::new();
    for entry in entries.chunks(2) {
        object.insert(text(&entry[0])?, typed_cell(&entry[1], catalog)?);
    }
    Ok(Json::Object(object))
}

// [[key id, value type, value], ...]
fn properties(value: &Value, catalog: &Catalog) -> Result<Json, DecodeError> {
    let mut object = Map::new();
    for property in items(value, "properties")? {
        let [key, kind, value] = fields::<3>(property, "property")?;
        let key = catalog.resolve(IdKind::PropertyKey, int(key, "property key id")?)?;
        object.insert(key.to_string(), scalar(int(kind, "value type")?, value, catalog)?);
    }
    Ok(Json::Object(object))
}

fn items<'a>(value: &'a Value, what: &str) -> Result<&'a [Value], DecodeError> {
    match value {
        Value::Bulk(items) => Ok(items),
        other => Err(malformed(what, other)),
    }
}

fn fields<'a, const N: usize>(
    value: &'a Value,
    what: &str,
) -> Result<&'a [Value; N], DecodeError> {
    items(value, what)?
        .try_into()
        .map_err(|_| malformed(&format!("{what} with {N} fields expected"), value))
}

fn text(value: &Value) -> Result<String, DecodeError> {
    match value {
        Value::Data(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        Value::Status(s) => Ok(s.clone()),
        Value::Okay => Ok("OK".to_string()),
        other => Err(malformed("expected a string", other)),
    }
}

fn int(value: &Value, what: &str) -> Result<i64, DecodeError> {
    match value {
        Value::Int(i) => Ok(*i),
        other => Err(malformed(what, other)),
    }
}

// Doubles arrive as strings. NaN and infinities have no JSON form and map to null.
fn double(value: &Value) -> Result<Json, DecodeError> {
    match value {
        Value::Int(i) => Ok(Json::from(*i as f64)),
        other => {
            let raw = text(other)?;
            raw.parse::<f64>()
                .map(Json::from)
                .map_err(|_| malformed("double", other))
        }
    }
}
