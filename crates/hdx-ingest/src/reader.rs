//! Raw readers for delimited and workbook sources.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use hdx_model::{SourceDescriptor, SourceKind, format_number};

use crate::decode::decode_with_fallback;
use crate::error::{IngestError, Result, read_error};

/// Undecorated cell grid of one source, before header handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
    /// Encoding used to decode a delimited source; `None` for workbooks.
    pub encoding: Option<String>,
}

/// Read a source according to its descriptor kind.
pub fn read_grid(path: &Path, descriptor: &SourceDescriptor) -> Result<RawGrid> {
    match descriptor.kind {
        SourceKind::Delimited => read_delimited(path, &descriptor.encodings),
        SourceKind::Workbook => {
            let sheet = descriptor
                .sheet
                .as_deref()
                .ok_or_else(|| IngestError::MissingSheet {
                    path: path.to_path_buf(),
                    sheet: String::new(),
                })?;
            read_workbook(path, sheet)
        }
    }
}

/// Read comma-separated text, trying `encodings` in order.
///
/// Rows may have differing lengths; the canonicalizer pads them.
pub fn read_delimited(path: &Path, encodings: &[String]) -> Result<RawGrid> {
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    let decoded = decode_with_fallback(path, &bytes, encodings)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(decoded.text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(ToString::to_string).collect());
    }

    Ok(RawGrid {
        rows,
        encoding: Some(decoded.encoding.to_string()),
    })
}

/// Read one named sheet of a workbook (xlsx, xls, xlsb or ods).
pub fn read_workbook(path: &Path, sheet: &str) -> Result<RawGrid> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(IngestError::MissingSheet {
            path: path.to_path_buf(),
            sheet: sheet.to_string(),
        });
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect();
    tracing::debug!(path = %path.display(), sheet, "read workbook sheet");
    Ok(RawGrid {
        rows,
        encoding: None,
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
