//! Descriptor-driven canonicalization of one source.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hdx_model::{CleanRecord, CleanTable, RawRow, SourceDescriptor, SourceStats};

use crate::error::{IngestError, Result};
use crate::filter::{RowClass, classify_row};
use crate::normalize::{normalize_header, normalize_numeric, normalize_text};
use crate::reader::{RawGrid, read_grid};

/// Read and canonicalize the file at `path`.
pub fn canonicalize_file(path: &Path, descriptor: &SourceDescriptor) -> Result<CleanTable> {
    let _span = tracing::info_span!("canonicalize", source = %descriptor.id, path = %path.display())
        .entered();
    let grid = read_grid(path, descriptor)?;
    let table = canonicalize_grid(path, descriptor, grid)?;
    tracing::info!(
        rows = table.stats.total,
        dropped_metadata = table.stats.dropped_metadata,
        dropped_empty = table.stats.dropped_empty,
        kept = table.stats.kept,
        malformed_numeric = table.stats.malformed_numeric,
        "canonicalized source"
    );
    Ok(table)
}

/// Canonical headers for a source: positional columns or the native header
/// row, then renamed.
fn canonical_headers(descriptor: &SourceDescriptor, native: &[String]) -> Vec<String> {
    let base: Vec<String> = match &descriptor.columns {
        Some(columns) => columns.iter().map(|c| c.trim().to_string()).collect(),
        None => native.iter().map(|h| normalize_header(h)).collect(),
    };
    base.into_iter()
        .map(|h| descriptor.rename.get(&h).cloned().unwrap_or(h))
        .collect()
}

/// Turn a raw grid into a clean table.
///
/// Rows above `header_row` are preamble. Data rows are padded to the header
/// width, classified by the row filter over every parsed header, and then
/// normalized field by field. Only `keep` columns (or all headers) are
/// retained in the output.
pub fn canonicalize_grid(
    path: &Path,
    descriptor: &SourceDescriptor,
    grid: RawGrid,
) -> Result<CleanTable> {
    let RawGrid { rows, encoding } = grid;
    let mut rows = rows.into_iter().skip(descriptor.header_row);
    let native = rows.next().ok_or_else(|| IngestError::NoHeaderRow {
        path: path.to_path_buf(),
        header_row: descriptor.header_row,
    })?;

    let headers = canonical_headers(descriptor, &native);
    let width = headers.len();

    // Duplicate headers resolve to the right-most column.
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if positions.insert(header.as_str(), idx).is_some() {
            tracing::warn!(source = %descriptor.id, column = %header, "duplicate column header");
        }
    }

    let output: Vec<String> = if descriptor.keep.is_empty() {
        let mut seen = BTreeSet::new();
        headers
            .iter()
            .filter(|h| seen.insert(h.as_str()))
            .cloned()
            .collect()
    } else {
        for column in &descriptor.keep {
            if !positions.contains_key(column.as_str()) {
                return Err(IngestError::MissingColumn {
                    column: column.clone(),
                    path: path.to_path_buf(),
                });
            }
        }
        descriptor.keep.clone()
    };
    let output_positions: Vec<(String, usize, bool)> = output
        .iter()
        .filter_map(|column| {
            positions
                .get(column.as_str())
                .map(|&idx| (column.clone(), idx, descriptor.is_numeric(column)))
        })
        .collect();

    let mut stats = SourceStats::default();
    let mut clean_rows = Vec::new();
    let first_data_line = descriptor.header_row + 2;
    for (offset, cells) in rows.enumerate() {
        let mut raw = RawRow::new(descriptor, first_data_line + offset, cells).padded(width);
        raw.cells.truncate(width);
        stats.total += 1;

        match classify_row(&raw.cells, &descriptor.filter) {
            RowClass::Empty => {
                stats.dropped_empty += 1;
                continue;
            }
            RowClass::Metadata => {
                tracing::trace!(source = %descriptor.id, line = raw.line, "dropped metadata row");
                stats.dropped_metadata += 1;
                continue;
            }
            RowClass::Keep => {}
        }

        let mut record = CleanRecord::new();
        for (column, idx, numeric) in &output_positions {
            let cell = &raw.cells[*idx];
            let value = if *numeric {
                let field = normalize_numeric(cell);
                if field.is_malformed() {
                    stats.malformed_numeric += 1;
                    tracing::trace!(
                        source = %descriptor.id,
                        line = raw.line,
                        column = %column,
                        value = %cell,
                        "malformed numeric kept verbatim"
                    );
                }
                field.into_string()
            } else {
                normalize_text(cell)
            };
            record.insert(column.clone(), value);
        }
        clean_rows.push(record);
        stats.kept += 1;
    }

    Ok(CleanTable {
        source_id: descriptor.id.clone(),
        headers: output,
        rows: clean_rows,
        stats,
        encoding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        RawGrid {
            rows: rows
                .iter()
                .map(|r| r.iter().map(ToString::to_string).collect())
                .collect(),
            encoding: Some("UTF-8".to_string()),
        }
    }

    #[test]
    fn counts_dropped_rows() {
        let descriptor = SourceDescriptor::fallback("hpc.csv").with_numeric(["Population"]);
        let table = canonicalize_grid(
            Path::new("hpc.csv"),
            &descriptor,
            grid(&[
                &["Country", "Admin 1", "Population", "Sector"],
                &["#country+code", "#adm1+name", "#population", "#sector"],
                &["SSD", "Jonglei", "1,234.50", "#1 priority"],
                &["", " ", "", ""],
                &["SSD", "Unity", "n/a", "Health"],
            ]),
        )
        .unwrap();
        assert_eq!(table.stats.total, 4);
        assert_eq!(table.stats.dropped_metadata, 1);
        assert_eq!(table.stats.dropped_empty, 1);
        assert_eq!(table.stats.kept, 2);
        assert_eq!(table.stats.malformed_numeric, 1);
        assert_eq!(table.rows[0].get("Population"), "1234.5");
        assert_eq!(table.rows[1].get("Population"), "n/a");
    }

    #[test]
    fn header_offset_and_positional_columns() {
        let descriptor = SourceDescriptor::fallback("demographic_data.csv")
            .with_header_row(1)
            .with_columns(["m49_code", "region_country_area", "year", "value"])
            .with_numeric(["year", "value"]);
        let table = canonicalize_grid(
            Path::new("demographic_data.csv"),
            &descriptor,
            grid(&[
                &["T02", "Population, Surface Area and Density"],
                &["Region/Country/Area", "", "Year", "Value"],
                &["729", "Sudan", "2023", "48,109.0"],
                &["1", "Total, all countries"],
            ]),
        )
        .unwrap();
        assert_eq!(table.headers, vec!["m49_code", "region_country_area", "year", "value"]);
        assert_eq!(table.rows[0].get("value"), "48109");
        // Short rows are padded, not dropped.
        assert_eq!(table.rows[1].get("year"), "");
        assert_eq!(table.stats.kept, 2);
    }

    #[test]
    fn rename_and_keep_select_canonical_columns() {
        let descriptor = SourceDescriptor::fallback("adm2.xlsx")
            .with_rename([("ADM2_EN", "county_name"), ("ADM2_PCODE", "county_pcode")])
            .with_keep(["county_pcode", "county_name"]);
        let table = canonicalize_grid(
            Path::new("adm2.xlsx"),
            &descriptor,
            grid(&[
                &["ADM2_EN", "ADM2_PCODE", "Shape_Leng"],
                &["  Bor   South ", "SS0301", "1.5"],
            ]),
        )
        .unwrap();
        assert_eq!(table.headers, vec!["county_pcode", "county_name"]);
        assert_eq!(table.rows[0].get("county_name"), "Bor South");
        assert!(!table.rows[0].contains("Shape_Leng"));
    }

    #[test]
    fn missing_keep_column_is_an_error() {
        let descriptor = SourceDescriptor::fallback("a.csv").with_keep(["absent"]);
        let err = canonicalize_grid(Path::new("a.csv"), &descriptor, grid(&[&["a"], &["1"]]))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }

    #[test]
    fn missing_header_row_is_an_error() {
        let descriptor = SourceDescriptor::fallback("a.csv").with_header_row(2);
        let err =
            canonicalize_grid(Path::new("a.csv"), &descriptor, grid(&[&["title"]])).unwrap_err();
        assert!(matches!(err, IngestError::NoHeaderRow { header_row: 2, .. }));
    }
}
