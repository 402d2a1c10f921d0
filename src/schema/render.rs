//! AVRO JSON rendering of schema graphs
//!
//! Named types are written in full the first time they are reached and by
//! full name afterwards, which keeps cyclic graphs finite.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

use super::{Name, SchemaGraph, SchemaId, SchemaNode, SchemaRef};

impl SchemaRef<'_> {
    /// Render the subgraph reachable from this node as AVRO JSON
    pub fn to_json(&self) -> Value {
        let mut seen = HashSet::new();
        render(self.graph(), self.id(), &mut seen)
    }

    /// Pretty-printed AVRO JSON
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_default()
    }
}

impl Serialize for SchemaRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

fn named(kind: &str, name: &Name) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".to_string(), json!(kind));
    obj.insert("name".to_string(), json!(name.fullname()));
    if !name.aliases().is_empty() {
        obj.insert("aliases".to_string(), json!(name.aliases()));
    }
    obj
}

fn render(graph: &SchemaGraph, id: SchemaId, seen: &mut HashSet<SchemaId>) -> Value {
    let Some(node) = graph.get(id) else {
        return Value::Null;
    };

    if let Some(name) = node.name() {
        if !seen.insert(id) {
            return json!(name.fullname());
        }
    }

    match node {
        SchemaNode::Array { items } => json!({
            "type": "array",
            "items": render(graph, *items, seen),
        }),
        SchemaNode::Map { values } => json!({
            "type": "map",
            "values": render(graph, *values, seen),
        }),
        SchemaNode::Union { branches } => Value::Array(
            branches
                .iter()
                .map(|branch| render(graph, *branch, seen))
                .collect(),
        ),
        SchemaNode::Fixed { name, size } => {
            let mut obj = named("fixed", name);
            obj.insert("size".to_string(), json!(size));
            Value::Object(obj)
        }
        SchemaNode::Enum { name, symbols } => {
            let mut obj = named("enum", name);
            obj.insert("symbols".to_string(), json!(symbols));
            Value::Object(obj)
        }
        SchemaNode::Record { name, fields } => {
            let mut obj = named("record", name);
            let fields: Vec<Value> = fields
                .iter()
                .map(|field| {
                    let mut f = Map::new();
                    f.insert("name".to_string(), json!(field.name));
                    f.insert("type".to_string(), render(graph, field.schema, seen));
                    if !field.aliases.is_empty() {
                        f.insert("aliases".to_string(), json!(field.aliases));
                    }
                    if let Some(default) = &field.default {
                        f.insert("default".to_string(), default.clone());
                    }
                    Value::Object(f)
                })
                .collect();
            obj.insert("fields".to_string(), Value::Array(fields));
            Value::Object(obj)
        }
        primitive => json!(primitive.kind().avro_name()),
    }
}
