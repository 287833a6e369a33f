//! CSV work queue.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::path::Path;

/// Column naming the prefix filters to act on.
pub const PF_NAME_COLUMN: &str = "pf_name";

/// Read the distinct `pf_name` values from a CSV file.
///
/// Names keep their first-seen order. Cells are trimmed and empty cells are
/// skipped. Columns other than `pf_name` are ignored.
pub fn read_prefix_names(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::InvalidCsv(e.to_string()))?;

    parse_names(&mut reader)
}

/// Same as [`read_prefix_names`] for in-memory CSV text.
pub fn parse_prefix_names(data: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    parse_names(&mut reader)
}

fn parse_names<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let column = reader
        .headers()
        .map_err(|e| Error::InvalidCsv(e.to_string()))?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == PF_NAME_COLUMN)
        .ok_or(Error::MissingColumn(PF_NAME_COLUMN))?;

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| Error::InvalidCsv(e.to_string()))?;
        let Some(name) = record.get(column).filter(|name| !name.is_empty()) else {
            tracing::debug!(line = ?record.position().map(|p| p.line()), "Skipping empty pf_name");
            continue;
        };
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}
