//! Error types for the transform stages.

use std::path::PathBuf;

use hdx_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A mandatory source could not be located.
    #[error("required source '{id}' not found in {searched}")]
    MissingSource { id: String, searched: String },

    /// A table lacks a column its builder depends on.
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Unknown source id requested from the catalog.
    #[error("source '{id}' is not declared in the catalog")]
    UnknownSource { id: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
