//! Source ingestion: decoding, row filtering and canonicalization.
//!
//! Every source goes through one routine driven by its
//! [`SourceDescriptor`](hdx_model::SourceDescriptor); nothing here branches on
//! a source's identity.

pub mod canonicalize;
pub mod decode;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod normalize;
pub mod reader;
pub mod writer;

pub use canonicalize::{canonicalize_file, canonicalize_grid};
pub use decode::{Decoded, decode_with_fallback};
pub use discovery::{file_name, list_csv_files, locate_source};
pub use error::{IngestError, Result};
pub use filter::{RowClass, classify_row, is_empty_row, is_metadata_row};
pub use normalize::{NumericField, normalize_header, normalize_numeric, normalize_text};
pub use reader::{RawGrid, read_delimited, read_grid, read_workbook};
pub use writer::{
    temp_path_for, write_atomic, write_clean_table, write_clean_tables, write_csv_rows,
};
