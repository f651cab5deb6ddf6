//! Materialization of the unified table.

use std::fs;
use std::path::{Path, PathBuf};

use hdx_ingest::{IngestError, write_atomic};
use polars::prelude::{
    Column, CsvWriter, DataFrame, NamedFrom, SerWriter, Series, SortMultipleOptions,
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::columns::SORT_COLUMNS;
use crate::error::{Result, TransformError};
use crate::unify::UnifiedTable;

/// Default output file name inside the data directory.
pub const DEFAULT_OUTPUT_NAME: &str = "unified_information.csv";

/// String-typed frame with one column per output header; absent values are null.
pub fn to_dataframe(table: &UnifiedTable) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .columns
        .iter()
        .map(|name| {
            let values: Vec<Option<String>> = table
                .records
                .iter()
                .map(|record| record.value(name).to_field())
                .collect();
            Series::new(name.as_str().into(), values).into()
        })
        .collect();
    DataFrame::new(columns).map_err(Into::into)
}

/// Stable sort by record level, state, county name and county code, nulls last.
pub fn sort_output(df: &DataFrame) -> Result<DataFrame> {
    let options = SortMultipleOptions::default()
        .with_nulls_last(true)
        .with_maintain_order(true);
    df.sort(SORT_COLUMNS, options).map_err(Into::into)
}

/// Result of writing the unified output.
#[derive(Debug, Clone, Serialize)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub sha256: String,
}

/// Sort and write `table` to `path` through a temporary file.
pub fn write_unified(path: &Path, table: &UnifiedTable) -> Result<OutputSummary> {
    let mut df = sort_output(&to_dataframe(table)?)?;
    write_atomic(path, |out| {
        CsvWriter::new(out)
            .include_header(true)
            .finish(&mut df)
            .map_err(|e| IngestError::FileWrite {
                operation: "write",
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })
    })?;
    let summary = OutputSummary {
        path: path.to_path_buf(),
        rows: df.height(),
        columns: df.width(),
        sha256: sha256_file(path)?,
    };
    tracing::info!(
        path = %path.display(),
        rows = summary.rows,
        sha256 = %summary.sha256,
        "wrote unified output"
    );
    Ok(summary)
}

/// Hex SHA-256 digest of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdx_model::{CountryCode, CountryIdentity, FactRow, GeographyKey, UnifiedRecord, Value};

    fn identity() -> CountryIdentity {
        CountryIdentity {
            iso3: CountryCode::parse("SSD").unwrap(),
            iso2: "SS".into(),
            name: "South Sudan".into(),
        }
    }

    fn county(state: &str, county: &str, pcode: &str) -> UnifiedRecord {
        UnifiedRecord::County {
            geography: GeographyKey::new(state, "SS00", county, pcode),
            country: identity(),
            facts: FactRow::new(),
        }
    }

    fn table() -> UnifiedTable {
        let national = UnifiedRecord::National {
            country: identity(),
            facts: FactRow::from([("population_2025_total".to_string(), Value::number(150.0))]),
        };
        UnifiedTable {
            columns: [
                "record_level",
                "state_name",
                "county_name",
                "county_pcode",
                "population_2025_total",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            records: vec![
                county("Unity", "Rubkona", "SS0608"),
                county("Jonglei", "Bor South", "SS0301"),
                county("Jonglei", "Bor South", "SS0300"),
                national,
            ],
            joins: Vec::new(),
        }
    }

    #[test]
    fn sorted_frame_puts_nationals_last() {
        let df = sort_output(&to_dataframe(&table()).unwrap()).unwrap();
        assert_eq!(df.height(), 4);
        let pcodes: Vec<Option<&str>> = df
            .column("county_pcode")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            pcodes,
            vec![Some("SS0300"), Some("SS0301"), Some("SS0608"), None]
        );
    }

    #[test]
    fn written_file_is_complete_and_hashed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT_NAME);
        let summary = write_unified(&path, &table()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("record_level,state_name,county_name,county_pcode,population_2025_total")
        );
        assert_eq!(lines.last(), Some("national,,,,150"));
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.sha256.len(), 64);
        assert!(!hdx_ingest::temp_path_for(&path).exists());
    }
}
