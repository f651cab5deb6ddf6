//! Per-source-format descriptors.
//!
//! A [`SourceDescriptor`] captures everything that differs between input
//! sources: how to decode the bytes, where the header sits, how columns are
//! renamed, which columns are numeric and which are retained. One generic
//! canonicalization routine consumes it; no source is special-cased in code.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Encodings tried when a descriptor does not declare its own list.
pub const DEFAULT_ENCODINGS: [&str; 2] = ["utf-8", "windows-1252"];

/// Marker that prefixes metadata rows (HXL hashtag rows and similar).
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// Fraction of non-blank cells that must carry the marker for a row to count as metadata.
pub const DEFAULT_METADATA_THRESHOLD: f64 = 0.5;

/// Physical layout of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Comma-separated text.
    #[default]
    Delimited,
    /// Spreadsheet workbook read from a named sheet.
    Workbook,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Workbook => "workbook",
        }
    }
}

/// Parameters of the schema-agnostic row filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilterPolicy {
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,
    #[serde(default = "default_metadata_threshold")]
    pub metadata_threshold: f64,
}

impl Default for RowFilterPolicy {
    fn default() -> Self {
        Self {
            comment_marker: default_comment_marker(),
            metadata_threshold: default_metadata_threshold(),
        }
    }
}

fn default_comment_marker() -> String {
    DEFAULT_COMMENT_MARKER.to_string()
}

fn default_metadata_threshold() -> f64 {
    DEFAULT_METADATA_THRESHOLD
}

fn default_encodings() -> Vec<String> {
    DEFAULT_ENCODINGS.iter().map(ToString::to_string).collect()
}

/// Declarative configuration for one source format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Stable identity of the source (e.g. `nutrition`).
    pub id: String,
    /// File name pattern; a single `*` matches any run of characters.
    pub pattern: String,
    #[serde(default)]
    pub kind: SourceKind,
    /// Worksheet to read for workbook sources.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Encoding labels in attempt order.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
    /// Zero-based index of the header row; rows above it are preamble.
    #[serde(default)]
    pub header_row: usize,
    /// Positional canonical headers replacing the native header row.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    /// Native header name to canonical name.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    /// Columns to retain, in output order. Empty keeps every parsed header.
    #[serde(default)]
    pub keep: Vec<String>,
    /// Canonical names of numeric columns.
    #[serde(default)]
    pub numeric: BTreeSet<String>,
    #[serde(flatten)]
    pub filter: RowFilterPolicy,
}

impl SourceDescriptor {
    /// Descriptor used for files that match no catalog entry.
    pub fn fallback(file_name: &str) -> Self {
        Self {
            id: file_name.to_string(),
            pattern: file_name.to_string(),
            kind: SourceKind::Delimited,
            sheet: None,
            encodings: default_encodings(),
            header_row: 0,
            columns: None,
            rename: BTreeMap::new(),
            keep: Vec::new(),
            numeric: BTreeSet::new(),
            filter: RowFilterPolicy::default(),
        }
    }

    pub fn with_numeric<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    pub fn with_encodings<I, S>(mut self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.encodings = encodings.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_rename<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.rename = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_keep<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keep = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Descriptor for this source's already-canonicalized copy.
    ///
    /// A clean copy is UTF-8 with its canonical header on the first row, so
    /// header offsets, positional columns and renames no longer apply.
    pub fn for_clean_copy(&self) -> Self {
        Self {
            kind: SourceKind::Delimited,
            sheet: None,
            encodings: vec!["utf-8".to_string()],
            header_row: 0,
            columns: None,
            rename: BTreeMap::new(),
            ..self.clone()
        }
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.contains(column)
    }

    /// Returns true when `file_name` matches the descriptor pattern (case-insensitive).
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        wildcard_match(
            &self.pattern.to_ascii_lowercase(),
            &file_name.to_ascii_lowercase(),
        )
    }

    /// Check the invariants the canonicalizer relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ModelError::InvalidDescriptor {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(invalid("empty id"));
        }
        if self.encodings.is_empty() {
            return Err(invalid("no encodings declared"));
        }
        if self.kind == SourceKind::Workbook && self.sheet.is_none() {
            return Err(invalid("workbook source without a sheet name"));
        }
        let threshold = self.filter.metadata_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(invalid("metadata_threshold must be in (0, 1]"));
        }
        if self.filter.comment_marker.is_empty() {
            return Err(invalid("empty comment_marker"));
        }
        if let Some(columns) = &self.columns
            && columns.iter().any(|c| c.trim().is_empty())
        {
            return Err(invalid("blank positional column name"));
        }
        Ok(())
    }
}

fn wildcard_match(pattern: &str, text: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == text,
        Some((prefix, rest)) => {
            let Some(remaining) = text.strip_prefix(prefix) else {
                return false;
            };
            if rest.is_empty() {
                return true;
            }
            (0..=remaining.len())
                .filter(|idx| remaining.is_char_boundary(*idx))
                .any(|idx| wildcard_match(rest, &remaining[idx..]))
        }
    }
}
