//! graphgate-core: Shared types, configuration, and error handling for graphgate.
//!
//! This crate provides the foundational pieces used by the gateway and the CLI:
//! - Query result shapes and their projections (flat values, keyed records, raw rows)
//! - Connection configuration resolution (argument > environment > file > default)
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigLoader, ConnectionConfig, ConnectionOptions};
pub use error::{CoreError, ProjectionError};
pub use types::{QueryOutput, QueryResult, Record, SchemaSummary};
