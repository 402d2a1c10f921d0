//! Rendering of compatibility outcomes for logs and the CLI

use serde_json::{json, Value};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

use crate::compatibility::{EvolutionReport, SchemaPairCompatibility};
use crate::result::CompatibilityResult;

/// Rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Append a line diff of writer vs reader to incompatible pairs
    pub show_diff: bool,
    /// Include the rendered schemas in JSON output
    pub include_schemas: bool,
}

/// Line diff between the writer and reader renderings
pub fn schema_diff(pair: &SchemaPairCompatibility<'_>) -> String {
    let writer = pair.writer.to_pretty_string();
    let reader = pair.reader.to_pretty_string();
    let diff = TextDiff::from_lines(&writer, &reader);

    let mut out = String::from("--- writer\n+++ reader\n");
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => '-',
            ChangeTag::Insert => '+',
            ChangeTag::Equal => ' ',
        };
        out.push(sign);
        out.push_str(change.value());
        if change.missing_newline() {
            out.push('\n');
        }
    }
    out
}

/// Plain-text report for one pair
pub fn render_text(pair: &SchemaPairCompatibility<'_>, options: ReportOptions) -> String {
    let mut out = String::new();
    match &pair.result {
        CompatibilityResult::Compatible => {
            let _ = writeln!(out, "✅ compatible");
            let _ = writeln!(out, "   {}", pair.description);
        }
        CompatibilityResult::Incompatible(details) => {
            let _ = writeln!(out, "❌ {}", details.kind);
            let _ = writeln!(out, "   location: {}", details.location);
            let _ = writeln!(out, "   message:  {}", details.message);
            if let (Ok(reader), Ok(writer)) = (
                pair.reader.graph().resolve(details.reader),
                pair.writer.graph().resolve(details.writer),
            ) {
                let _ = writeln!(
                    out,
                    "   reader:   {} / writer: {}",
                    reader.kind(),
                    writer.kind()
                );
            }
            let recursive = pair.reader.graph().recursive_types();
            if !recursive.is_empty() {
                let _ = writeln!(out, "   recursive reader types: {}", recursive.join(", "));
            }
            out.push('\n');
            out.push_str(&pair.description);
            if options.show_diff {
                out.push('\n');
                out.push_str(&schema_diff(pair));
            }
        }
    }
    out
}

/// JSON report for one pair
pub fn render_json(pair: &SchemaPairCompatibility<'_>, options: ReportOptions) -> Value {
    let mut value = json!({
        "result": pair.result,
        "description": pair.description,
    });
    if options.include_schemas {
        value["reader"] = pair.reader.to_json();
        value["writer"] = pair.writer.to_json();
    }
    value
}

/// Plain-text report for a schema change checked under a mode
pub fn render_evolution_text(report: &EvolutionReport<'_>, options: ReportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🔍 mode: {}", report.mode);
    if report.checks.is_empty() {
        let _ = writeln!(out, "   (no checks performed)");
    }
    for (pair, direction) in report.checks.iter().zip(directions(report)) {
        let _ = writeln!(out, "\n── {} ──", direction);
        out.push_str(&render_text(pair, options));
    }
    out
}

/// JSON report for a schema change checked under a mode
pub fn render_evolution_json(report: &EvolutionReport<'_>, options: ReportOptions) -> Value {
    let checks: Vec<Value> = report
        .checks
        .iter()
        .zip(directions(report))
        .map(|(pair, direction)| {
            let mut value = render_json(pair, options);
            value["direction"] = json!(direction);
            value
        })
        .collect();
    json!({
        "mode": report.mode,
        "compatible": report.is_compatible(),
        "checks": checks,
    })
}

fn directions(report: &EvolutionReport<'_>) -> Vec<&'static str> {
    use crate::compatibility::CompatibilityMode;
    match report.mode {
        CompatibilityMode::Backward => vec!["backward"],
        CompatibilityMode::Forward => vec!["forward"],
        CompatibilityMode::Full => vec!["backward", "forward"],
        CompatibilityMode::None => vec![],
    }
}
