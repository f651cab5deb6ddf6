//! Raw and canonical row representations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::SourceDescriptor;

/// A decoded but not yet normalized row, tied to the descriptor that produced it.
#[derive(Debug, Clone)]
pub struct RawRow<'a> {
    pub descriptor: &'a SourceDescriptor,
    /// One-based position in the source, counting the header row.
    pub line: usize,
    pub cells: Vec<String>,
}

impl<'a> RawRow<'a> {
    pub fn new(descriptor: &'a SourceDescriptor, line: usize, cells: Vec<String>) -> Self {
        Self {
            descriptor,
            line,
            cells,
        }
    }

    /// Pad with empty strings up to `width` cells.
    pub fn padded(mut self, width: usize) -> Self {
        if self.cells.len() < width {
            self.cells.resize(width, String::new());
        }
        self
    }
}

/// Canonical column name to normalized value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord(BTreeMap<String, String>);

impl CleanRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    /// Value of `column`, or the empty string when absent.
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    /// Value of `column` when present and non-blank.
    pub fn get_non_empty(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CleanRecord {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Row accounting for one canonicalized source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub total: usize,
    pub dropped_metadata: usize,
    pub dropped_empty: usize,
    pub kept: usize,
    /// Numeric cells that failed to parse and were kept verbatim.
    pub malformed_numeric: usize,
}

/// The canonical form of one source: ordered headers plus clean rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanTable {
    pub source_id: String,
    pub headers: Vec<String>,
    pub rows: Vec<CleanRecord>,
    pub stats: SourceStats,
    /// Encoding label actually used to decode the source.
    pub encoding: Option<String>,
}

impl CleanTable {
    pub fn new(source_id: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            source_id: source_id.into(),
            headers,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Rows as ordered cell vectors matching `headers`.
    pub fn ordered_rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.rows
            .iter()
            .map(|row| self.headers.iter().map(|h| row.get(h)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_pads_to_header_width() {
        let descriptor = SourceDescriptor::fallback("a.csv");
        let row = RawRow::new(&descriptor, 2, vec!["x".to_string()]).padded(3);
        assert_eq!(row.cells, vec!["x", "", ""]);
    }

    #[test]
    fn clean_record_lookup() {
        let record: CleanRecord = [("a", "1"), ("b", " ")].into_iter().collect();
        assert_eq!(record.get("a"), "1");
        assert_eq!(record.get("missing"), "");
        assert_eq!(record.get_non_empty("b"), None);
    }

    #[test]
    fn ordered_rows_follow_headers() {
        let mut table = CleanTable::new("t", vec!["b".into(), "a".into()]);
        table.rows.push([("a", "1"), ("b", "2")].into_iter().collect());
        let rows: Vec<Vec<&str>> = table.ordered_rows().collect();
        assert_eq!(rows, vec![vec!["2", "1"]]);
    }
}
