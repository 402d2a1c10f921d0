//! Compatibility results

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::location::Location;
use crate::schema::NodeKey;

/// Why a reader cannot decode data produced by a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncompatibilityKind {
    NameMismatch,
    FixedSizeMismatch,
    MissingEnumSymbols,
    ReaderFieldMissingDefaultValue,
    TypeMismatch,
    MissingUnionBranch,
}

impl IncompatibilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncompatibilityKind::NameMismatch => "NAME_MISMATCH",
            IncompatibilityKind::FixedSizeMismatch => "FIXED_SIZE_MISMATCH",
            IncompatibilityKind::MissingEnumSymbols => "MISSING_ENUM_SYMBOLS",
            IncompatibilityKind::ReaderFieldMissingDefaultValue => {
                "READER_FIELD_MISSING_DEFAULT_VALUE"
            }
            IncompatibilityKind::TypeMismatch => "TYPE_MISMATCH",
            IncompatibilityKind::MissingUnionBranch => "MISSING_UNION_BRANCH",
        }
    }
}

impl fmt::Display for IncompatibilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of the first incompatibility found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incompatibility {
    pub kind: IncompatibilityKind,
    /// Path from the root pair to the failing node
    pub location: Location,
    pub message: String,
    /// Reader node involved (not necessarily the root)
    pub reader: NodeKey,
    /// Writer node involved (not necessarily the root)
    pub writer: NodeKey,
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.location, self.message)
    }
}

/// Outcome of a reader/writer check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "compatibility", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityResult {
    Compatible,
    Incompatible(Incompatibility),
}

impl CompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        matches!(self, CompatibilityResult::Compatible)
    }

    pub fn incompatibility(&self) -> Option<&Incompatibility> {
        match self {
            CompatibilityResult::Compatible => None,
            CompatibilityResult::Incompatible(details) => Some(details),
        }
    }

    pub fn kind(&self) -> Option<IncompatibilityKind> {
        self.incompatibility().map(|i| i.kind)
    }

    /// Pointer-style location of the failure; `None` when compatible
    pub fn location(&self) -> Option<String> {
        self.incompatibility().map(|i| i.location.to_pointer())
    }

    pub fn message(&self) -> Option<&str> {
        self.incompatibility().map(|i| i.message.as_str())
    }
}

impl fmt::Display for CompatibilityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityResult::Compatible => f.write_str("COMPATIBLE"),
            CompatibilityResult::Incompatible(details) => write!(f, "INCOMPATIBLE: {}", details),
        }
    }
}
