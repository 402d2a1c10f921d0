//! Memoized reader/writer compatibility checker
//!
//! Recursive walk over a reader node and a writer node. Every visited pair is
//! memoized by node identity. A pair found "in progress" closes a cycle and is
//! optimistically treated as compatible, which guarantees termination on
//! recursive schemas: an incompatibility that can only manifest strictly
//! inside a cycle is not reported.
//!
//! The traversal is depth-first in declared field/branch order and stops at
//! the first incompatibility.

use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use crate::error::{Result, SchemaError};
use crate::location::{PathTracker, ROOT_TOKEN};
use crate::resolution::{lookup_writer_field, schema_name_equals};
use crate::result::{CompatibilityResult, Incompatibility, IncompatibilityKind};
use crate::schema::{Field, Name, NodeKey, SchemaKind, SchemaNode, SchemaRef};

#[derive(Debug, Clone)]
enum MemoEntry {
    /// The pair is on the current recursion stack
    InProgress,
    /// Final result, and the tracker depth at which the pair's own frame sat
    Resolved {
        result: CompatibilityResult,
        depth: usize,
    },
}

/// Reports whether a reader schema can decode data written with a writer schema.
///
/// One checker serves one top-level request; its memo table and path tracker
/// are never shared between threads.
#[derive(Debug, Default)]
pub struct ReaderWriterChecker {
    memo: HashMap<(NodeKey, NodeKey), MemoEntry>,
    path: PathTracker,
}

impl ReaderWriterChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a reader/writer pair.
    ///
    /// `Ok(Incompatible(..))` is the normal negative answer. `Err` means the
    /// schemas themselves are ill-formed (for example a reader field whose
    /// aliases match several writer fields) and no answer exists.
    ///
    /// Every call starts from an empty memo table: a pair resolved as
    /// compatible only because it closed a cycle says nothing about the same
    /// pair checked as a new root.
    pub fn check(&mut self, reader: SchemaRef<'_>, writer: SchemaRef<'_>) -> Result<CompatibilityResult> {
        self.memo.clear();
        self.path.clear();
        self.check_at(ROOT_TOKEN, reader, writer)
    }

    fn check_at(
        &mut self,
        token: &str,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
    ) -> Result<CompatibilityResult> {
        self.path.push(token);
        let depth = self.path.len();
        let key = (reader.key(), writer.key());
        debug!(
            reader = %reader.kind(),
            writer = %writer.kind(),
            location = %self.path.snapshot(),
            "checking compatibility"
        );

        match self.memo.get(&key) {
            Some(MemoEntry::InProgress) => {
                trace!(reader = %reader.id(), writer = %writer.id(), "recursion in progress, assuming compatible");
                self.path.pop();
                return Ok(CompatibilityResult::Compatible);
            }
            Some(MemoEntry::Resolved { result, depth: origin }) => {
                trace!(reader = %reader.id(), writer = %writer.id(), "memo hit");
                let result = result.clone();
                let origin = *origin;
                return Ok(self.replay(result, origin));
            }
            None => {}
        }

        self.memo.insert(key, MemoEntry::InProgress);
        let calculated = self.calculate(reader, writer)?;
        if calculated.is_compatible() {
            self.path.pop();
        }
        self.memo.insert(
            key,
            MemoEntry::Resolved {
                result: calculated.clone(),
                depth,
            },
        );
        Ok(calculated)
    }

    /// Re-root a memoized result at the current position. The trail recorded
    /// below the pair's own frame is pushed back onto the tracker so the
    /// retained frames still spell out the path to the failure.
    fn replay(&mut self, result: CompatibilityResult, origin: usize) -> CompatibilityResult {
        match result {
            CompatibilityResult::Compatible => {
                self.path.pop();
                CompatibilityResult::Compatible
            }
            CompatibilityResult::Incompatible(mut details) => {
                let tokens = details.location.tokens();
                let trail = tokens[origin.min(tokens.len())..].to_vec();
                self.path.extend(&trail);
                details.location = self.path.snapshot();
                CompatibilityResult::Incompatible(details)
            }
        }
    }

    fn calculate(&mut self, reader: SchemaRef<'_>, writer: SchemaRef<'_>) -> Result<CompatibilityResult> {
        if reader.kind() == writer.kind() {
            return self.calculate_same_kind(reader, writer);
        }

        // Reader compatible with all branches of a writer union is compatible
        if let SchemaNode::Union { branches } = writer.node() {
            for (i, branch) in branches.iter().enumerate() {
                let result = self.check_at(&i.to_string(), reader, writer.at(*branch)?)?;
                if !result.is_compatible() {
                    return Ok(result);
                }
            }
            return Ok(CompatibilityResult::Compatible);
        }

        let writer_kind = writer.kind();
        match reader.node() {
            SchemaNode::Long => Ok(self.promote(reader, writer, matches!(writer_kind, SchemaKind::Int))),
            SchemaNode::Float => Ok(self.promote(
                reader,
                writer,
                matches!(writer_kind, SchemaKind::Int | SchemaKind::Long),
            )),
            SchemaNode::Double => Ok(self.promote(
                reader,
                writer,
                matches!(writer_kind, SchemaKind::Int | SchemaKind::Long | SchemaKind::Float),
            )),
            SchemaNode::Bytes => Ok(self.promote(reader, writer, writer_kind == SchemaKind::String)),
            SchemaNode::String => Ok(self.promote(reader, writer, writer_kind == SchemaKind::Bytes)),
            SchemaNode::Union { branches } => {
                let mark = self.path.len();
                for (i, branch) in branches.iter().enumerate() {
                    match self.check_at(&i.to_string(), reader.at(*branch)?, writer)? {
                        CompatibilityResult::Compatible => return Ok(CompatibilityResult::Compatible),
                        CompatibilityResult::Incompatible(_) => self.path.truncate(mark),
                    }
                }
                Ok(self.incompatible(
                    IncompatibilityKind::MissingUnionBranch,
                    reader,
                    writer,
                    format!("reader union lacking writer type: {}", writer_kind),
                ))
            }
            SchemaNode::Null
            | SchemaNode::Boolean
            | SchemaNode::Int
            | SchemaNode::Array { .. }
            | SchemaNode::Map { .. }
            | SchemaNode::Fixed { .. }
            | SchemaNode::Enum { .. }
            | SchemaNode::Record { .. } => Ok(self.type_mismatch(reader, writer)),
        }
    }

    fn calculate_same_kind(&mut self, reader: SchemaRef<'_>, writer: SchemaRef<'_>) -> Result<CompatibilityResult> {
        match (reader.node(), writer.node()) {
            (SchemaNode::Null, SchemaNode::Null)
            | (SchemaNode::Boolean, SchemaNode::Boolean)
            | (SchemaNode::Int, SchemaNode::Int)
            | (SchemaNode::Long, SchemaNode::Long)
            | (SchemaNode::Float, SchemaNode::Float)
            | (SchemaNode::Double, SchemaNode::Double)
            | (SchemaNode::Bytes, SchemaNode::Bytes)
            | (SchemaNode::String, SchemaNode::String) => Ok(CompatibilityResult::Compatible),

            (SchemaNode::Array { items: r }, SchemaNode::Array { items: w }) => {
                self.check_at("items", reader.at(*r)?, writer.at(*w)?)
            }
            (SchemaNode::Map { values: r }, SchemaNode::Map { values: w }) => {
                self.check_at("values", reader.at(*r)?, writer.at(*w)?)
            }
            (
                SchemaNode::Fixed { name: reader_name, size: reader_size },
                SchemaNode::Fixed { name: writer_name, size: writer_size },
            ) => {
                let names = self.check_names(reader, writer, reader_name, writer_name);
                if !names.is_compatible() {
                    return Ok(names);
                }
                Ok(self.check_fixed_size(reader, writer, *reader_size, *writer_size))
            }
            (
                SchemaNode::Enum { name: reader_name, symbols: reader_symbols },
                SchemaNode::Enum { name: writer_name, symbols: writer_symbols },
            ) => {
                let names = self.check_names(reader, writer, reader_name, writer_name);
                if !names.is_compatible() {
                    return Ok(names);
                }
                Ok(self.check_enum_symbols(reader, writer, reader_symbols, writer_symbols))
            }
            (
                SchemaNode::Record { name: reader_name, fields: reader_fields },
                SchemaNode::Record { name: writer_name, fields: writer_fields },
            ) => {
                let names = self.check_names(reader, writer, reader_name, writer_name);
                if !names.is_compatible() {
                    return Ok(names);
                }
                self.check_record_fields(reader, writer, reader_fields, writer_name, writer_fields)
            }
            (SchemaNode::Union { .. }, SchemaNode::Union { branches }) => {
                // Each branch of the writer union must be decodable by the whole reader
                for (i, branch) in branches.iter().enumerate() {
                    let writer_branch = writer.at(*branch)?;
                    let result = self.check_at(&i.to_string(), reader, writer_branch)?;
                    if !result.is_compatible() {
                        return Ok(self.incompatible(
                            IncompatibilityKind::MissingUnionBranch,
                            reader,
                            writer,
                            format!("reader union lacking writer type: {}", writer_branch.kind()),
                        ));
                    }
                }
                Ok(CompatibilityResult::Compatible)
            }
            (r, w) => Err(SchemaError::InvalidSchema(format!(
                "unknown schema kind pairing: reader {} / writer {}",
                r.kind(),
                w.kind()
            ))),
        }
    }

    fn check_record_fields(
        &mut self,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
        reader_fields: &[Field],
        writer_name: &Name,
        writer_fields: &[Field],
    ) -> Result<CompatibilityResult> {
        self.path.push("fields");
        for reader_field in reader_fields {
            self.path.push(reader_field.position.to_string());
            match lookup_writer_field(writer_name, writer_fields, reader_field)? {
                None => {
                    // Unpopulated reader fields must fall back to a default
                    if !reader_field.has_default() {
                        return Ok(self.incompatible(
                            IncompatibilityKind::ReaderFieldMissingDefaultValue,
                            reader,
                            writer,
                            reader_field.name.clone(),
                        ));
                    }
                }
                Some(writer_field) => {
                    let result = self.check_at(
                        "type",
                        reader.at(reader_field.schema)?,
                        writer.at(writer_field.schema)?,
                    )?;
                    if !result.is_compatible() {
                        return Ok(result);
                    }
                }
            }
            self.path.pop();
        }
        self.path.pop();
        Ok(CompatibilityResult::Compatible)
    }

    fn check_enum_symbols(
        &mut self,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
        reader_symbols: &[String],
        writer_symbols: &[String],
    ) -> CompatibilityResult {
        self.path.push("symbols");
        let missing: BTreeSet<&str> = writer_symbols
            .iter()
            .map(String::as_str)
            .filter(|symbol| !reader_symbols.iter().any(|s| s.as_str() == *symbol))
            .collect();
        if !missing.is_empty() {
            let listed: Vec<&str> = missing.into_iter().collect();
            return self.incompatible(
                IncompatibilityKind::MissingEnumSymbols,
                reader,
                writer,
                format!("[{}]", listed.join(", ")),
            );
        }
        self.path.pop();
        CompatibilityResult::Compatible
    }

    fn check_fixed_size(
        &mut self,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
        actual: usize,
        expected: usize,
    ) -> CompatibilityResult {
        self.path.push("size");
        if actual != expected {
            return self.incompatible(
                IncompatibilityKind::FixedSizeMismatch,
                reader,
                writer,
                format!("expected: {}, found: {}", expected, actual),
            );
        }
        self.path.pop();
        CompatibilityResult::Compatible
    }

    fn check_names(
        &mut self,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
        reader_name: &Name,
        writer_name: &Name,
    ) -> CompatibilityResult {
        self.path.push("name");
        if !schema_name_equals(reader_name, writer_name) {
            return self.incompatible(
                IncompatibilityKind::NameMismatch,
                reader,
                writer,
                format!("expected: {}", writer_name.fullname()),
            );
        }
        self.path.pop();
        CompatibilityResult::Compatible
    }

    fn promote(&mut self, reader: SchemaRef<'_>, writer: SchemaRef<'_>, accepted: bool) -> CompatibilityResult {
        if accepted {
            CompatibilityResult::Compatible
        } else {
            self.type_mismatch(reader, writer)
        }
    }

    fn type_mismatch(&mut self, reader: SchemaRef<'_>, writer: SchemaRef<'_>) -> CompatibilityResult {
        self.incompatible(
            IncompatibilityKind::TypeMismatch,
            reader,
            writer,
            format!(
                "reader type: {} not compatible with writer type: {}",
                reader.kind(),
                writer.kind()
            ),
        )
    }

    fn incompatible(
        &self,
        kind: IncompatibilityKind,
        reader: SchemaRef<'_>,
        writer: SchemaRef<'_>,
        message: String,
    ) -> CompatibilityResult {
        CompatibilityResult::Incompatible(Incompatibility {
            kind,
            location: self.path.snapshot(),
            message,
            reader: reader.key(),
            writer: writer.key(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaGraph, SchemaGraphBuilder};

    fn check(graph: &SchemaGraph, reader: crate::schema::SchemaId, writer: crate::schema::SchemaId) -> CompatibilityResult {
        ReaderWriterChecker::new()
            .check(graph.schema(reader).unwrap(), graph.schema(writer).unwrap())
            .unwrap()
    }

    #[test]
    fn test_promotions_and_their_reverse() {
        let mut b = SchemaGraphBuilder::new();
        let (int, long, float, double) = (b.int(), b.long(), b.float(), b.double());
        let (bytes, string) = (b.bytes(), b.string());
        let graph = b.build().unwrap();

        let promotions = [
            (long, int),
            (float, int),
            (float, long),
            (double, int),
            (double, long),
            (double, float),
            (bytes, string),
            (string, bytes),
        ];
        for (reader, writer) in promotions {
            assert!(check(&graph, reader, writer).is_compatible());
        }

        for (writer, reader) in promotions.into_iter().filter(|(r, w)| !(*r == bytes || *w == bytes)) {
            let result = check(&graph, reader, writer);
            assert_eq!(result.kind(), Some(IncompatibilityKind::TypeMismatch));
            assert_eq!(result.location().as_deref(), Some("/"));
        }
    }

    #[test]
    fn test_type_mismatch_message_names_both_kinds() {
        let mut b = SchemaGraphBuilder::new();
        let (int, long) = (b.int(), b.long());
        let graph = b.build().unwrap();

        let result = check(&graph, int, long);
        assert_eq!(
            result.message(),
            Some("reader type: INT not compatible with writer type: LONG")
        );
        let details = result.incompatibility().unwrap();
        assert_eq!((details.reader.id, details.writer.id), (int, long));
        assert_eq!(details.reader.graph, graph.id());
    }

    #[test]
    fn test_nested_location_through_array_and_map() {
        let mut b = SchemaGraphBuilder::new();
        let reader_leaf = b.int();
        let reader_map = b.map(reader_leaf).unwrap();
        let reader = b.array(reader_map).unwrap();
        let writer_leaf = b.string();
        let writer_map = b.map(writer_leaf).unwrap();
        let writer = b.array(writer_map).unwrap();
        let graph = b.build().unwrap();

        let result = check(&graph, reader, writer);
        assert_eq!(result.kind(), Some(IncompatibilityKind::TypeMismatch));
        assert_eq!(result.location().as_deref(), Some("/items/values"));
        let details = result.incompatibility().unwrap();
        assert_eq!((details.reader.id, details.writer.id), (reader_leaf, writer_leaf));
    }

    #[test]
    fn test_fixed_name_then_size() {
        let mut b = SchemaGraphBuilder::new();
        let md5 = b.fixed(Name::new("md5"), 16).unwrap();
        let sha = b.fixed(Name::new("sha"), 16).unwrap();
        let graph = b.build().unwrap();

        let result = check(&graph, md5, sha);
        assert_eq!(result.kind(), Some(IncompatibilityKind::NameMismatch));
        assert_eq!(result.location().as_deref(), Some("/name"));
        assert_eq!(result.message(), Some("expected: sha"));

        let mut b = SchemaGraphBuilder::new();
        let reader = b.fixed(Name::new("hash"), 16).unwrap();
        let reader_graph = b.build().unwrap();
        let mut b = SchemaGraphBuilder::new();
        let writer = b.fixed(Name::new("hash"), 32).unwrap();
        let writer_graph = b.build().unwrap();

        let result = ReaderWriterChecker::new()
            .check(reader_graph.schema(reader).unwrap(), writer_graph.schema(writer).unwrap())
            .unwrap();
        assert_eq!(result.kind(), Some(IncompatibilityKind::FixedSizeMismatch));
        assert_eq!(result.location().as_deref(), Some("/size"));
        assert_eq!(result.message(), Some("expected: 32, found: 16"));

        // Involved nodes resolve in their own graphs only
        let details = result.incompatibility().unwrap();
        assert_eq!(reader_graph.resolve(details.reader).unwrap().id(), reader);
        assert_eq!(writer_graph.resolve(details.writer).unwrap().id(), writer);
        assert!(writer_graph.resolve(details.reader).is_err());
    }

    #[test]
    fn test_missing_enum_symbols_are_sorted() {
        let mut b = SchemaGraphBuilder::new();
        let reader = b.enumeration(Name::new("Suit"), ["SPADES"]).unwrap();
        let reader_graph = b.build().unwrap();
        let mut b = SchemaGraphBuilder::new();
        let writer = b.enumeration(Name::new("Suit"), ["SPADES", "HEARTS", "CLUBS"]).unwrap();
        let writer_graph = b.build().unwrap();

        let result = ReaderWriterChecker::new()
            .check(reader_graph.schema(reader).unwrap(), writer_graph.schema(writer).unwrap())
            .unwrap();
        assert_eq!(result.kind(), Some(IncompatibilityKind::MissingEnumSymbols));
        assert_eq!(result.location().as_deref(), Some("/symbols"));
        assert_eq!(result.message(), Some("[CLUBS, HEARTS]"));
    }

    #[test]
    fn test_writer_union_branch_failure_keeps_nested_location() {
        let mut b = SchemaGraphBuilder::new();
        let reader_items = b.long();
        let reader = b.array(reader_items).unwrap();
        let int = b.int();
        let writer_int_array = b.array(int).unwrap();
        let double = b.double();
        let writer_double_array = b.array(double).unwrap();
        let writer = b.union([writer_int_array, writer_double_array]).unwrap();
        let graph = b.build().unwrap();

        let result = check(&graph, reader, writer);
        assert_eq!(result.kind(), Some(IncompatibilityKind::TypeMismatch));
        assert_eq!(result.location().as_deref(), Some("/1/items"));
    }

    #[test]
    fn test_same_kind_union_reports_offending_branch() {
        let mut b = SchemaGraphBuilder::new();
        let (null, int) = (b.null(), b.int());
        let reader = b.union([null, int]).unwrap();
        let (w_null, w_int, w_string) = (b.null(), b.int(), b.string());
        let writer = b.union([w_null, w_int, w_string]).unwrap();
        let graph = b.build().unwrap();

        let result = check(&graph, reader, writer);
        assert_eq!(result.kind(), Some(IncompatibilityKind::MissingUnionBranch));
        assert_eq!(result.location().as_deref(), Some("/2"));
        assert_eq!(result.message(), Some("reader union lacking writer type: STRING"));
        let details = result.incompatibility().unwrap();
        assert_eq!((details.reader.id, details.writer.id), (reader, writer));
    }

    #[test]
    fn test_failed_reader_branches_leave_no_stale_frames() {
        let mut b = SchemaGraphBuilder::new();
        let reader_int = b.int();
        let reader_items = b.array(reader_int).unwrap();
        let reader_record = b.record(Name::new("R")).unwrap();
        b.define_fields(reader_record, vec![]).unwrap();
        let reader_union = b.union([reader_items, reader_record]).unwrap();
        let reader = b.array(reader_union).unwrap();

        let writer_string = b.string();
        let writer_items = b.array(writer_string).unwrap();
        let writer = b.array(writer_items).unwrap();
        let graph = b.build().unwrap();

        let result = check(&graph, reader, writer);
        assert_eq!(result.kind(), Some(IncompatibilityKind::MissingUnionBranch));
        assert_eq!(result.location().as_deref(), Some("/items"));
        assert_eq!(result.message(), Some("reader union lacking writer type: ARRAY"));
    }

    #[test]
    fn test_memoized_failure_is_rerooted_at_second_position() {
        // Field 0 tries the shared pair inside a reader union and falls back
        // to another branch; field 1 is then answered from the memo table.
        let mut b = SchemaGraphBuilder::new();
        let int = b.int();
        let shared = b.array(int).unwrap();
        let long = b.long();
        let wide = b.array(long).unwrap();
        let either = b.union([shared, wide]).unwrap();
        let reader = b.record(Name::new("Pair")).unwrap();
        b.define_fields(
            reader,
            vec![Field::new("first", either), Field::new("second", shared)],
        )
        .unwrap();
        let reader_graph = b.build().unwrap();

        let mut b = SchemaGraphBuilder::new();
        let long = b.long();
        let writer_shared = b.array(long).unwrap();
        let writer = b.record(Name::new("Pair")).unwrap();
        b.define_fields(
            writer,
            vec![Field::new("first", writer_shared), Field::new("second", writer_shared)],
        )
        .unwrap();
        let writer_graph = b.build().unwrap();

        let mut checker = ReaderWriterChecker::new();
        let reader_root = reader_graph.schema(reader).unwrap();
        let writer_root = writer_graph.schema(writer).unwrap();

        let first = checker.check(reader_root, writer_root).unwrap();
        assert_eq!(first.kind(), Some(IncompatibilityKind::TypeMismatch));
        assert_eq!(first.location().as_deref(), Some("/fields/1/type/items"));
        let details = first.incompatibility().unwrap();
        assert_eq!((details.reader.id, details.writer.id), (int, long));

        let second = checker.check(reader_root, writer_root).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reused_checker_matches_a_fresh_one() {
        // RQ { f0: RP, f1: int }, RP { g: RQ } against
        // WQ { f0: WP, f1: string }, WP { g: WQ }
        let mut b = SchemaGraphBuilder::new();
        let rq = b.record(Name::new("Q")).unwrap();
        let rp = b.record(Name::new("P")).unwrap();
        let int = b.int();
        b.define_fields(rq, vec![Field::new("f0", rp), Field::new("f1", int)])
            .unwrap();
        b.define_fields(rp, vec![Field::new("g", rq)]).unwrap();
        let reader_graph = b.build().unwrap();

        let mut b = SchemaGraphBuilder::new();
        let wq = b.record(Name::new("Q")).unwrap();
        let wp = b.record(Name::new("P")).unwrap();
        let string = b.string();
        b.define_fields(wq, vec![Field::new("f0", wp), Field::new("f1", string)])
            .unwrap();
        b.define_fields(wp, vec![Field::new("g", wq)]).unwrap();
        let writer_graph = b.build().unwrap();

        let inner_reader = reader_graph.schema(rp).unwrap();
        let inner_writer = writer_graph.schema(wp).unwrap();

        let fresh = ReaderWriterChecker::new()
            .check(inner_reader, inner_writer)
            .unwrap();
        assert_eq!(fresh.kind(), Some(IncompatibilityKind::TypeMismatch));
        assert_eq!(
            fresh.location().as_deref(),
            Some("/fields/0/type/fields/1/type")
        );

        let mut checker = ReaderWriterChecker::new();
        let outer = checker
            .check(reader_graph.schema(rq).unwrap(), writer_graph.schema(wq).unwrap())
            .unwrap();
        assert_eq!(outer.location().as_deref(), Some("/fields/1/type"));
        let reused = checker.check(inner_reader, inner_writer).unwrap();
        assert_eq!(fresh, reused);
    }

    #[test]
    fn test_ambiguous_field_alias_is_fatal() {
        let mut b = SchemaGraphBuilder::new();
        let int_reader = b.int();
        let reader = b.record(Name::new("User")).unwrap();
        b.define_fields(reader, vec![Field::new("name", int_reader).with_aliases(["full_name"])])
            .unwrap();
        let reader_graph = b.build().unwrap();
        let mut b = SchemaGraphBuilder::new();
        let int = b.int();
        let writer = b.record(Name::new("User")).unwrap();
        b.define_fields(writer, vec![Field::new("name", int), Field::new("full_name", int)])
            .unwrap();
        let writer_graph = b.build().unwrap();

        let mut checker = ReaderWriterChecker::new();
        let err = checker
            .check(reader_graph.schema(reader).unwrap(), writer_graph.schema(writer).unwrap())
            .unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousFieldAlias { .. }));

        // The aborted walk leaves nothing behind for the next request
        let int_ref = reader_graph.schema(int_reader).unwrap();
        assert!(checker.check(int_ref, int_ref).unwrap().is_compatible());
    }
}
