use thiserror::Error;

/// Top-level error type for configuration and shared concerns.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A query result whose rows do not have the shape a projection needs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("Row {row} has {found} values but the header has {expected} columns")]
    RowShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row} has no columns")]
    MissingColumn { row: usize },

    #[error("Row {row} column 0 is not a string: {value}")]
    NotAString {
        row: usize,
        value: serde_json::Value,
    },
}
