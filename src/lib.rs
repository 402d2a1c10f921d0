//! Schema Compatibility
//!
//! Decides whether data written with one schema (the *writer*) can always be
//! decoded by a program expecting another schema (the *reader*), for AVRO-style
//! schemas with primitives, containers, named types and unions.
//!
//! ## Features
//!
//! - **Cyclic Schemas**: Self-referencing named types terminate via memoization
//! - **Type Promotion**: `int -> long -> float -> double`, `string <-> bytes`
//! - **Aliases**: Reader-side aliases for named types and record fields
//! - **Precise Diagnostics**: Kind, JSON-pointer location and involved nodes
//!   of the first incompatibility
//! - **Evolution Modes**: Backward, forward and full checks of a schema change
//!
//! ## Architecture
//!
//! ```text
//! check_reader_writer_compatibility(reader, writer)
//! └── ReaderWriterChecker            (one per request)
//!     ├── memo: (reader, writer) identity pair -> result
//!     ├── path tracker               (pointer location of the failure)
//!     └── recursive check over SchemaGraph nodes
//! ```
//!
//! ## Example
//!
//! ```
//! use schema_compat::{check_reader_writer_compatibility, SchemaDocument};
//!
//! let reader = SchemaDocument::parse_str(r#"{"type": "array", "items": "long"}"#)?;
//! let writer = SchemaDocument::parse_str(r#"{"type": "array", "items": "int"}"#)?;
//!
//! let pair = check_reader_writer_compatibility(reader.schema(), writer.schema())?;
//! assert!(pair.is_compatible());
//! # Ok::<(), schema_compat::SchemaError>(())
//! ```

pub mod checker;
pub mod compatibility;
pub mod config;
pub mod error;
pub mod location;
pub mod report;
pub mod resolution;
pub mod result;
pub mod schema;

pub use checker::ReaderWriterChecker;
pub use compatibility::{
    check_compatibility, check_reader_writer_compatibility, CompatibilityMode, EvolutionReport,
    SchemaPairCompatibility, READER_WRITER_COMPATIBLE_MESSAGE,
};
pub use config::{CompatConfig, OutputFormat};
pub use error::{Result, SchemaError};
pub use location::Location;
pub use result::{CompatibilityResult, Incompatibility, IncompatibilityKind};
pub use schema::{
    Field, GraphId, Name, NodeKey, SchemaDocument, SchemaGraph, SchemaGraphBuilder, SchemaId,
    SchemaKind, SchemaNode, SchemaRef,
};
