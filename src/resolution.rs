//! Name and field resolution between reader and writer
//!
//! Aliases are one-directional: only the reader's aliases are consulted.

use crate::error::{Result, SchemaError};
use crate::schema::{Field, Name};

/// Whether a reader named type accepts data written under the writer's name
pub fn schema_name_equals(reader: &Name, writer: &Name) -> bool {
    reader.fullname() == writer.fullname() || reader.aliases().contains(writer.fullname())
}

/// Find the writer field that populates `reader_field`.
///
/// Matches by exact name and by each of the reader field's aliases. No match
/// yields `Ok(None)`. Several distinct writer fields matching is a defect in
/// the reader schema and is reported as [`SchemaError::AmbiguousFieldAlias`].
pub fn lookup_writer_field<'a>(
    writer_record: &Name,
    writer_fields: &'a [Field],
    reader_field: &Field,
) -> Result<Option<&'a Field>> {
    let find = |name: &str| writer_fields.iter().find(|f| f.name == name);

    let mut matches: Vec<&'a Field> = Vec::new();
    let candidates = std::iter::once(reader_field.name.as_str())
        .chain(reader_field.aliases.iter().map(String::as_str));
    for candidate in candidates {
        if let Some(field) = find(candidate) {
            if !matches.iter().any(|m| m.position == field.position) {
                matches.push(field);
            }
        }
    }

    match matches.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(*single)),
        _ => Err(SchemaError::AmbiguousFieldAlias {
            field: reader_field.name.clone(),
            record: writer_record.fullname().to_string(),
            matches: matches.iter().map(|f| f.name.clone()).collect(),
        }),
    }
}
