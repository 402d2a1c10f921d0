//! Schema Graph
//!
//! Immutable, possibly cyclic graph of typed schema nodes backed by petgraph.
//! Named types that reference themselves (directly or through other named
//! types) form real cycles: the child reference points back at the node
//! identity, it is not a by-name lookup.
//!
//! Graphs are assembled with [`SchemaGraphBuilder`] or loaded from AVRO text
//! via [`SchemaDocument::parse_str`], and are never mutated afterwards.

pub mod avro;
pub mod builder;
pub mod render;

pub use builder::SchemaGraphBuilder;

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use crate::error::{Result, SchemaError};

/// Index of a node within one [`SchemaGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaId(usize);

impl SchemaId {
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn node_index(self) -> NodeIndex {
        NodeIndex::new(self.0)
    }
}

impl From<NodeIndex> for SchemaId {
    fn from(idx: NodeIndex) -> Self {
        Self(idx.index())
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Process-unique identifier of a built graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GraphId(u64);

impl GraphId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identity of a node across all graphs: memo tables key on this, never on
/// structural equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeKey {
    pub graph: GraphId,
    pub id: SchemaId,
}

/// Kind tag of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Array,
    Map,
    Fixed,
    Enum,
    Record,
    Union,
}

impl SchemaKind {
    /// Name used in AVRO JSON (`"int"`, `"record"`, ...)
    pub fn avro_name(&self) -> &'static str {
        match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int => "int",
            SchemaKind::Long => "long",
            SchemaKind::Float => "float",
            SchemaKind::Double => "double",
            SchemaKind::Bytes => "bytes",
            SchemaKind::String => "string",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Enum => "enum",
            SchemaKind::Record => "record",
            SchemaKind::Union => "union",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.avro_name().to_ascii_uppercase())
    }
}

/// Fully-qualified name of a named type plus the alias full names it accepts
/// when used on the reader side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    fullname: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    aliases: BTreeSet<String>,
}

impl Name {
    pub fn new(fullname: impl Into<String>) -> Self {
        Self {
            fullname: fullname.into(),
            aliases: BTreeSet::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn fullname(&self) -> &str {
        &self.fullname
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fullname)
    }
}

/// A record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub schema: SchemaId,
    /// Declared position within the record (assigned by the builder)
    pub position: usize,
    /// `None` means no default was declared. A declared JSON `null` default
    /// is `Some(Value::Null)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: SchemaId) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            schema,
            position: 0,
            default: None,
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// A typed schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaNode {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Array { items: SchemaId },
    Map { values: SchemaId },
    Fixed { name: Name, size: usize },
    Enum { name: Name, symbols: Vec<String> },
    Record { name: Name, fields: Vec<Field> },
    Union { branches: Vec<SchemaId> },
}

impl SchemaNode {
    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaNode::Null => SchemaKind::Null,
            SchemaNode::Boolean => SchemaKind::Boolean,
            SchemaNode::Int => SchemaKind::Int,
            SchemaNode::Long => SchemaKind::Long,
            SchemaNode::Float => SchemaKind::Float,
            SchemaNode::Double => SchemaKind::Double,
            SchemaNode::Bytes => SchemaKind::Bytes,
            SchemaNode::String => SchemaKind::String,
            SchemaNode::Array { .. } => SchemaKind::Array,
            SchemaNode::Map { .. } => SchemaKind::Map,
            SchemaNode::Fixed { .. } => SchemaKind::Fixed,
            SchemaNode::Enum { .. } => SchemaKind::Enum,
            SchemaNode::Record { .. } => SchemaKind::Record,
            SchemaNode::Union { .. } => SchemaKind::Union,
        }
    }

    /// Name of a `Fixed`, `Enum` or `Record` node
    pub fn name(&self) -> Option<&Name> {
        match self {
            SchemaNode::Fixed { name, .. }
            | SchemaNode::Enum { name, .. }
            | SchemaNode::Record { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Containment edge between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    Items,
    Values,
    Field(usize),
    Branch(usize),
}

/// The schema graph
pub struct SchemaGraph {
    /// Process-unique identity of this graph
    pub(crate) id: GraphId,

    /// Node weights are the schema nodes, edges mirror their child references
    pub(crate) graph: DiGraph<SchemaNode, Reference>,

    /// Index: full name -> named node
    pub(crate) by_name: HashMap<String, SchemaId>,

    /// Number of strongly connected components that contain a cycle
    pub(crate) cycles: usize,

    /// Every node that lies on a cycle
    pub(crate) recursive: HashSet<SchemaId>,
}

impl SchemaGraph {
    pub fn builder() -> SchemaGraphBuilder {
        SchemaGraphBuilder::new()
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn get(&self, id: SchemaId) -> Option<&SchemaNode> {
        self.graph.node_weight(id.node_index())
    }

    /// Get a node, failing if `id` does not belong to this graph
    pub fn node(&self, id: SchemaId) -> Result<&SchemaNode> {
        self.get(id).ok_or(SchemaError::UnknownSchema {
            graph: self.id.get(),
            id: id.index(),
        })
    }

    /// Handle on a node, usable as a reader or writer root
    pub fn schema(&self, id: SchemaId) -> Result<SchemaRef<'_>> {
        let node = self.node(id)?;
        Ok(SchemaRef {
            graph: self,
            id,
            node,
        })
    }

    /// Find a named type by full name
    pub fn lookup(&self, fullname: &str) -> Option<SchemaId> {
        self.by_name.get(fullname).copied()
    }

    /// Handle on the node a [`NodeKey`] names, failing if the key belongs
    /// to another graph
    pub fn resolve(&self, key: NodeKey) -> Result<SchemaRef<'_>> {
        if key.graph != self.id {
            return Err(SchemaError::UnknownSchema {
                graph: key.graph.get(),
                id: key.id.index(),
            });
        }
        self.schema(key.id)
    }

    /// Whether the node lies on a reference cycle
    pub fn is_recursive(&self, id: SchemaId) -> bool {
        self.recursive.contains(&id)
    }

    /// Full names of the named types that participate in a cycle, sorted
    pub fn recursive_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .recursive
            .iter()
            .filter_map(|id| self.get(*id))
            .filter_map(|node| node.name())
            .map(|name| name.fullname())
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SchemaGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaGraph")
            .field("id", &self.id)
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .field("named", &self.by_name.len())
            .field("cycles", &self.cycles)
            .finish()
    }
}

/// Borrowed handle on one node of a [`SchemaGraph`].
///
/// Equality is identity: two handles are equal when they point at the same
/// node of the same graph.
#[derive(Clone, Copy)]
pub struct SchemaRef<'g> {
    graph: &'g SchemaGraph,
    id: SchemaId,
    node: &'g SchemaNode,
}

impl<'g> SchemaRef<'g> {
    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn node(&self) -> &'g SchemaNode {
        self.node
    }

    pub fn kind(&self) -> SchemaKind {
        self.node.kind()
    }

    /// Handle on another node of the same graph (typically a child)
    pub fn at(&self, id: SchemaId) -> Result<SchemaRef<'g>> {
        self.graph.schema(id)
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            graph: self.graph.id,
            id: self.id,
        }
    }
}

impl PartialEq for SchemaRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SchemaRef<'_> {}

impl fmt::Debug for SchemaRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRef")
            .field("graph", &self.graph.id.get())
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

/// An owned graph together with its root node
#[derive(Debug)]
pub struct SchemaDocument {
    graph: SchemaGraph,
    root: SchemaId,
}

impl SchemaDocument {
    pub fn new(graph: SchemaGraph, root: SchemaId) -> Result<Self> {
        graph.node(root)?;
        Ok(Self { graph, root })
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn root(&self) -> SchemaId {
        self.root
    }

    /// Handle on the root node
    pub fn schema(&self) -> SchemaRef<'_> {
        SchemaRef {
            graph: &self.graph,
            id: self.root,
            node: &self.graph.graph[self.root.node_index()],
        }
    }
}
