//! Schema compatibility facade
//!
//! Entry points that wrap [`ReaderWriterChecker`] results together with the
//! two root schemas and a human-readable description.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::checker::ReaderWriterChecker;
use crate::error::Result;
use crate::result::CompatibilityResult;
use crate::schema::SchemaRef;

/// Description attached to compatible pairs
pub const READER_WRITER_COMPATIBLE_MESSAGE: &str =
    "Reader schema can always successfully decode data written using the writer schema.";

/// Outcome of checking one reader/writer pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaPairCompatibility<'g> {
    pub result: CompatibilityResult,
    pub reader: SchemaRef<'g>,
    pub writer: SchemaRef<'g>,
    pub description: String,
}

impl SchemaPairCompatibility<'_> {
    pub fn is_compatible(&self) -> bool {
        self.result.is_compatible()
    }
}

impl fmt::Display for SchemaPairCompatibility<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)
    }
}

/// Check that data written with `writer` can be decoded with `reader`.
///
/// A fresh checker is used per call, so concurrent calls share no state.
pub fn check_reader_writer_compatibility<'g>(
    reader: SchemaRef<'g>,
    writer: SchemaRef<'g>,
) -> Result<SchemaPairCompatibility<'g>> {
    let result = ReaderWriterChecker::new().check(reader, writer)?;
    tracing::debug!(verdict = %result, "reader/writer check finished");

    let description = match &result {
        CompatibilityResult::Compatible => READER_WRITER_COMPATIBLE_MESSAGE.to_string(),
        CompatibilityResult::Incompatible(_) => {
            format!(
                "Data encoded using writer schema:\n{}\nwill or may fail to decode using reader schema:\n{}\n",
                writer.to_pretty_string(),
                reader.to_pretty_string()
            )
        }
    };

    Ok(SchemaPairCompatibility {
        result,
        reader,
        writer,
        description,
    })
}

/// Direction(s) in which a schema change must stay compatible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityMode {
    /// New schema can read data written with the old one
    #[default]
    Backward,
    /// Old schema can read data written with the new one
    Forward,
    /// Both backward and forward
    Full,
    /// No checking
    None,
}

impl CompatibilityMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompatibilityMode::Backward => "backward",
            CompatibilityMode::Forward => "forward",
            CompatibilityMode::Full => "full",
            CompatibilityMode::None => "none",
        }
    }
}

impl fmt::Display for CompatibilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompatibilityMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "backward" => Ok(CompatibilityMode::Backward),
            "forward" => Ok(CompatibilityMode::Forward),
            "full" => Ok(CompatibilityMode::Full),
            "none" => Ok(CompatibilityMode::None),
            other => Err(format!(
                "unknown compatibility mode '{}' (expected backward, forward, full or none)",
                other
            )),
        }
    }
}

/// Result of validating a schema change under a [`CompatibilityMode`]
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionReport<'g> {
    pub mode: CompatibilityMode,
    /// Every reader/writer pair that was evaluated, backward first
    pub checks: Vec<SchemaPairCompatibility<'g>>,
}

impl EvolutionReport<'_> {
    pub fn is_compatible(&self) -> bool {
        self.checks.iter().all(SchemaPairCompatibility::is_compatible)
    }
}

/// Validate a change from `old` to `new` under `mode`
pub fn check_compatibility<'g>(
    mode: CompatibilityMode,
    new: SchemaRef<'g>,
    old: SchemaRef<'g>,
) -> Result<EvolutionReport<'g>> {
    let mut checks = Vec::new();
    if matches!(mode, CompatibilityMode::Backward | CompatibilityMode::Full) {
        checks.push(check_reader_writer_compatibility(new, old)?);
    }
    if matches!(mode, CompatibilityMode::Forward | CompatibilityMode::Full) {
        checks.push(check_reader_writer_compatibility(old, new)?);
    }
    tracing::debug!(mode = %mode, checks = checks.len(), "evolution checked");
    Ok(EvolutionReport { mode, checks })
}
