//! Schema Graph Builder
//!
//! The only mutable phase of a [`SchemaGraph`]. Records are declared first and
//! their fields defined later so a field can refer back to its own record.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::DiGraph;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Field, GraphId, Name, Reference, SchemaGraph, SchemaId, SchemaKind, SchemaNode};
use crate::error::{Result, SchemaError};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Incrementally assembles a [`SchemaGraph`]
#[derive(Debug, Default)]
pub struct SchemaGraphBuilder {
    graph: DiGraph<SchemaNode, Reference>,
    by_name: HashMap<String, SchemaId>,
    /// Records declared but not yet given fields
    pending: BTreeMap<SchemaId, String>,
}

impl SchemaGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, node: SchemaNode) -> SchemaId {
        SchemaId::from(self.graph.add_node(node))
    }

    fn kind_of(&self, id: SchemaId) -> Result<SchemaKind> {
        self.graph
            .node_weight(id.node_index())
            .map(SchemaNode::kind)
            .ok_or_else(|| {
                SchemaError::InvalidSchema(format!("reference to undeclared node {}", id))
            })
    }

    fn register(&mut self, name: &Name, id: SchemaId) -> Result<()> {
        if self.by_name.contains_key(name.fullname()) {
            return Err(SchemaError::InvalidSchema(format!(
                "named type redefined: {}",
                name
            )));
        }
        self.by_name.insert(name.fullname().to_string(), id);
        Ok(())
    }

    pub fn null(&mut self) -> SchemaId {
        self.add(SchemaNode::Null)
    }

    pub fn boolean(&mut self) -> SchemaId {
        self.add(SchemaNode::Boolean)
    }

    pub fn int(&mut self) -> SchemaId {
        self.add(SchemaNode::Int)
    }

    pub fn long(&mut self) -> SchemaId {
        self.add(SchemaNode::Long)
    }

    pub fn float(&mut self) -> SchemaId {
        self.add(SchemaNode::Float)
    }

    pub fn double(&mut self) -> SchemaId {
        self.add(SchemaNode::Double)
    }

    pub fn bytes(&mut self) -> SchemaId {
        self.add(SchemaNode::Bytes)
    }

    pub fn string(&mut self) -> SchemaId {
        self.add(SchemaNode::String)
    }

    pub fn array(&mut self, items: SchemaId) -> Result<SchemaId> {
        self.kind_of(items)?;
        let id = self.add(SchemaNode::Array { items });
        self.graph
            .add_edge(id.node_index(), items.node_index(), Reference::Items);
        Ok(id)
    }

    pub fn map(&mut self, values: SchemaId) -> Result<SchemaId> {
        self.kind_of(values)?;
        let id = self.add(SchemaNode::Map { values });
        self.graph
            .add_edge(id.node_index(), values.node_index(), Reference::Values);
        Ok(id)
    }

    /// Add a union. A branch may not itself be a union.
    pub fn union(&mut self, branches: impl IntoIterator<Item = SchemaId>) -> Result<SchemaId> {
        let branches: Vec<SchemaId> = branches.into_iter().collect();
        for branch in &branches {
            if self.kind_of(*branch)? == SchemaKind::Union {
                return Err(SchemaError::InvalidSchema(
                    "unions may not immediately contain other unions".to_string(),
                ));
            }
        }
        let id = self.add(SchemaNode::Union {
            branches: branches.clone(),
        });
        for (i, branch) in branches.iter().enumerate() {
            self.graph
                .add_edge(id.node_index(), branch.node_index(), Reference::Branch(i));
        }
        Ok(id)
    }

    pub fn fixed(&mut self, name: Name, size: usize) -> Result<SchemaId> {
        let id = self.add(SchemaNode::Fixed {
            name: name.clone(),
            size,
        });
        self.register(&name, id)?;
        Ok(id)
    }

    pub fn enumeration<I, S>(&mut self, name: Name, symbols: I) -> Result<SchemaId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let mut seen = HashSet::new();
        if let Some(dup) = symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(SchemaError::InvalidSchema(format!(
                "enum {} declares symbol {} twice",
                name, dup
            )));
        }
        let id = self.add(SchemaNode::Enum {
            name: name.clone(),
            symbols,
        });
        self.register(&name, id)?;
        Ok(id)
    }

    /// Declare a record. Its fields are supplied later with
    /// [`define_fields`](Self::define_fields), so the returned id can already
    /// be used as a field type (including inside the record itself).
    pub fn record(&mut self, name: Name) -> Result<SchemaId> {
        let id = self.add(SchemaNode::Record {
            name: name.clone(),
            fields: Vec::new(),
        });
        self.register(&name, id)?;
        self.pending.insert(id, name.fullname().to_string());
        Ok(id)
    }

    /// Define the fields of a declared record. Positions follow the order given.
    pub fn define_fields(&mut self, record: SchemaId, fields: Vec<Field>) -> Result<()> {
        let Some(fullname) = self.pending.remove(&record) else {
            return Err(SchemaError::InvalidSchema(format!(
                "node {} is not a record awaiting its fields",
                record
            )));
        };

        let mut names = HashSet::new();
        let mut positioned = Vec::with_capacity(fields.len());
        for (position, mut field) in fields.into_iter().enumerate() {
            self.kind_of(field.schema)?;
            if !names.insert(field.name.clone()) {
                return Err(SchemaError::InvalidSchema(format!(
                    "record {} declares field {} twice",
                    fullname, field.name
                )));
            }
            field.position = position;
            self.graph.add_edge(
                record.node_index(),
                field.schema.node_index(),
                Reference::Field(position),
            );
            positioned.push(field);
        }

        if let Some(SchemaNode::Record { fields, .. }) =
            self.graph.node_weight_mut(record.node_index())
        {
            *fields = positioned;
        }
        Ok(())
    }

    /// Find a named type declared so far
    pub fn lookup(&self, fullname: &str) -> Option<SchemaId> {
        self.by_name.get(fullname).copied()
    }

    /// Freeze the graph. Fails if a declared record never received its fields.
    pub fn build(self) -> Result<SchemaGraph> {
        if let Some(name) = self.pending.values().next() {
            return Err(SchemaError::UnresolvedReference(name.clone()));
        }

        let mut cycles = 0;
        let mut recursive = HashSet::new();
        for component in kosaraju_scc(&self.graph) {
            let cyclic = component.len() > 1
                || self.graph.find_edge(component[0], component[0]).is_some();
            if cyclic {
                recursive.extend(component.into_iter().map(SchemaId::from));
                cycles += 1;
            }
        }

        let id = GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(
            graph = id.get(),
            nodes = self.graph.node_count(),
            cycles,
            "schema graph built"
        );

        Ok(SchemaGraph {
            id,
            graph: self.graph,
            by_name: self.by_name,
            cycles,
            recursive,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_referencing_record_is_recursive() {
        let mut builder = SchemaGraphBuilder::new();
        let long = builder.long();
        let node = builder.record(Name::new("LongList")).unwrap();
        let null = builder.null();
        let next = builder.union([null, node]).unwrap();
        builder
            .define_fields(node, vec![Field::new("value", long), Field::new("next", next)])
            .unwrap();
        let graph = builder.build().unwrap();

        assert!(graph.is_recursive(node));
        assert!(graph.is_recursive(next));
        assert!(!graph.is_recursive(long));
        assert_eq!(graph.recursive_types(), vec!["LongList"]);
    }

    #[test]
    fn test_undefined_record_fails_build() {
        let mut builder = SchemaGraphBuilder::new();
        builder.record(Name::new("Dangling")).unwrap();

        let err = builder.build().unwrap_err();
        assert!(matches!(err, SchemaError::UnresolvedReference(name) if name == "Dangling"));
    }

    #[test]
    fn test_nested_union_is_rejected() {
        let mut builder = SchemaGraphBuilder::new();
        let int = builder.int();
        let inner = builder.union([int]).unwrap();
        assert!(builder.union([inner]).is_err());
    }

    #[test]
    fn test_field_positions_follow_declaration_order() {
        let mut builder = SchemaGraphBuilder::new();
        let int = builder.int();
        let rec = builder.record(Name::new("Pair")).unwrap();
        builder
            .define_fields(rec, vec![Field::new("a", int), Field::new("b", int)])
            .unwrap();
        let graph = builder.build().unwrap();

        let Some(SchemaNode::Record { fields, .. }) = graph.get(rec) else {
            panic!("expected a record");
        };
        let positions: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.position)).collect();
        assert_eq!(positions, vec![("a", 0), ("b", 1)]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut builder = SchemaGraphBuilder::new();
        builder.fixed(Name::new("md5"), 16).unwrap();
        assert!(builder.enumeration(Name::new("md5"), ["A"]).is_err());
        assert!(builder.enumeration(Name::new("Suit"), ["A", "A"]).is_err());
    }
}
