use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use common::ReferenceRecord;
use tracing::debug;

use crate::errors::ReferenceError;

const FIELD_SEPARATOR: char = ',';

fn parse_field(field: &str, line: usize, column: usize) -> Result<i64, ReferenceError> {
    let trimmed = field.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();

    unquoted.parse().map_err(|_| ReferenceError::InvalidField {
        line,
        column,
        value: field.to_string(),
    })
}

/// Reads ground-truth rows in file order: the first two comma separated fields of every row are
/// `frame_id` and `timestamp_ms`, anything after them is ignored.
///
/// Rows with fewer than two fields, blank lines included, are skipped. A field that is not an
/// integer fails the whole read.
pub fn read_reference_rows<R: BufRead>(reader: R) -> Result<Vec<ReferenceRecord>, ReferenceError> {
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;

        let mut fields = line.split(FIELD_SEPARATOR);
        let (Some(frame_id), Some(timestamp_ms)) = (fields.next(), fields.next()) else {
            debug!(line = line_number, "skipping reference row with fewer than two fields");
            continue;
        };

        rows.push(ReferenceRecord {
            frame_id: parse_field(frame_id, line_number, 1)?,
            timestamp_ms: parse_field(timestamp_ms, line_number, 2)?,
        });
    }

    Ok(rows)
}

pub fn read_reference_file<P: AsRef<Path>>(path: P) -> Result<Vec<ReferenceRecord>, ReferenceError> {
    let file = File::open(path)?;
    read_reference_rows(BufReader::new(file))
}
