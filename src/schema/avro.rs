//! AVRO bridge
//!
//! Parsing `.avsc` text is delegated to `apache-avro`. This module turns the
//! parsed tree into a [`SchemaGraph`], resolving `Schema::Ref` entries to the
//! node of the named type they refer to so recursive types become real cycles.

use apache_avro::schema::{Alias, Name as AvroName, RecordSchema};
use apache_avro::Schema as AvroSchema;
use std::path::Path;

use super::{Field, Name, SchemaDocument, SchemaGraphBuilder, SchemaId};
use crate::error::{Result, SchemaError};

impl SchemaDocument {
    /// Convert an already parsed AVRO schema
    pub fn from_avro(schema: &AvroSchema) -> Result<Self> {
        let mut converter = AvroConverter {
            builder: SchemaGraphBuilder::new(),
        };
        let root = converter.convert(schema)?;
        let graph = converter.builder.build()?;
        Self::new(graph, root)
    }

    /// Parse AVRO JSON text
    pub fn parse_str(input: &str) -> Result<Self> {
        let schema = AvroSchema::parse_str(input)?;
        Self::from_avro(&schema)
    }

    /// Parse an `.avsc` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading schema");
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content)
    }
}

struct AvroConverter {
    builder: SchemaGraphBuilder,
}

fn convert_name(name: &AvroName, aliases: &Option<Vec<Alias>>) -> Name {
    let aliases = aliases
        .iter()
        .flatten()
        .map(|alias| alias.fullname(name.namespace.clone()));
    Name::new(name.fullname(None)).with_aliases(aliases)
}

impl AvroConverter {
    fn convert(&mut self, schema: &AvroSchema) -> Result<SchemaId> {
        match schema {
            AvroSchema::Null => Ok(self.builder.null()),
            AvroSchema::Boolean => Ok(self.builder.boolean()),
            AvroSchema::Int => Ok(self.builder.int()),
            AvroSchema::Long => Ok(self.builder.long()),
            AvroSchema::Float => Ok(self.builder.float()),
            AvroSchema::Double => Ok(self.builder.double()),
            AvroSchema::Bytes => Ok(self.builder.bytes()),
            AvroSchema::String => Ok(self.builder.string()),
            AvroSchema::Array(items) => {
                let items = self.convert(items)?;
                self.builder.array(items)
            }
            AvroSchema::Map(values) => {
                let values = self.convert(values)?;
                self.builder.map(values)
            }
            AvroSchema::Union(union) => {
                let branches = union
                    .variants()
                    .iter()
                    .map(|branch| self.convert(branch))
                    .collect::<Result<Vec<_>>>()?;
                self.builder.union(branches)
            }
            AvroSchema::Record(record) => self.convert_record(record),
            AvroSchema::Enum(schema) => self.builder.enumeration(
                convert_name(&schema.name, &schema.aliases),
                schema.symbols.iter().cloned(),
            ),
            AvroSchema::Fixed(schema) => self
                .builder
                .fixed(convert_name(&schema.name, &schema.aliases), schema.size),
            // Logical types are checked as their underlying representation
            AvroSchema::Decimal(decimal) => self.convert(&decimal.inner),
            AvroSchema::Uuid => Ok(self.builder.string()),
            AvroSchema::Date | AvroSchema::TimeMillis => Ok(self.builder.int()),
            AvroSchema::TimeMicros
            | AvroSchema::TimestampMillis
            | AvroSchema::TimestampMicros
            | AvroSchema::LocalTimestampMillis
            | AvroSchema::LocalTimestampMicros => Ok(self.builder.long()),
            AvroSchema::Ref { name } => {
                let fullname = name.fullname(None);
                self.builder
                    .lookup(&fullname)
                    .ok_or(SchemaError::UnresolvedReference(fullname))
            }
            #[allow(unreachable_patterns)]
            other => Err(SchemaError::UnsupportedAvro(format!("{:?}", other))),
        }
    }

    fn convert_record(&mut self, record: &RecordSchema) -> Result<SchemaId> {
        let id = self
            .builder
            .record(convert_name(&record.name, &record.aliases))?;

        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let schema = self.convert(&field.schema)?;
            let mut converted =
                Field::new(&field.name, schema).with_aliases(field.aliases.iter().flatten().cloned());
            if let Some(default) = &field.default {
                converted = converted.with_default(default.clone());
            }
            fields.push(converted);
        }

        self.builder.define_fields(id, fields)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaKind, SchemaNode};

    #[test]
    fn test_recursive_avro_schema_becomes_a_cycle() {
        let doc = SchemaDocument::parse_str(
            r#"{
                "type": "record",
                "name": "LongList",
                "namespace": "org.example",
                "aliases": ["LinkedLongs"],
                "fields": [
                    {"name": "value", "type": "long"},
                    {"name": "next", "type": ["null", "LongList"], "default": null}
                ]
            }"#,
        )
        .unwrap();

        let graph = doc.graph();
        let root = doc.schema();
        assert_eq!(root.kind(), SchemaKind::Record);
        assert!(graph.is_recursive(doc.root()));
        assert_eq!(graph.recursive_types(), vec!["org.example.LongList"]);

        let SchemaNode::Record { name, fields } = root.node() else {
            panic!("expected a record");
        };
        assert_eq!(name.fullname(), "org.example.LongList");
        assert!(name.aliases().contains("org.example.LinkedLongs"));
        assert_eq!(fields[1].default, Some(serde_json::Value::Null));

        let SchemaNode::Union { branches } = graph.get(fields[1].schema).unwrap() else {
            panic!("expected a union");
        };
        assert_eq!(branches[1], doc.root());
    }

    #[test]
    fn test_logical_types_use_underlying_representation() {
        let doc = SchemaDocument::parse_str(
            r#"{
                "type": "record",
                "name": "Event",
                "fields": [
                    {"name": "id", "type": {"type": "string", "logicalType": "uuid"}},
                    {"name": "day", "type": {"type": "int", "logicalType": "date"}},
                    {"name": "at", "type": {"type": "long", "logicalType": "timestamp-millis"}}
                ]
            }"#,
        )
        .unwrap();

        let SchemaNode::Record { fields, .. } = doc.schema().node() else {
            panic!("expected a record");
        };
        let kinds: Vec<_> = fields
            .iter()
            .map(|f| doc.graph().get(f.schema).unwrap().kind())
            .collect();
        assert_eq!(kinds, vec![SchemaKind::String, SchemaKind::Int, SchemaKind::Long]);
    }

    #[test]
    fn test_invalid_text_is_an_avro_error() {
        let err = SchemaDocument::parse_str(r#"{"type": "nope"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::Avro(_)));
    }
}
