//! Error types for compatibility checking
//!
//! An incompatible reader/writer pair is *not* an error: it is reported through
//! [`CompatibilityResult`](crate::CompatibilityResult). The variants here cover
//! schema-definition defects that make a check meaningless.

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema model and checker errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Reader record field {field} matches multiple fields in writer record schema {record}: {matches:?}")]
    AmbiguousFieldAlias {
        field: String,
        record: String,
        matches: Vec<String>,
    },

    #[error("Unknown schema node {id} in graph {graph}")]
    UnknownSchema { graph: u64, id: usize },

    #[error("Unresolved reference to named type: {0}")]
    UnresolvedReference(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Unsupported AVRO schema: {0}")]
    UnsupportedAvro(String),

    #[error("AVRO error: {0}")]
    Avro(#[from] apache_avro::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}
