//! Data model for the humanitarian data integration pipeline.
//!
//! - **source**: per-source descriptors consumed by the canonicalizer
//! - **record**: raw rows, clean records and clean tables
//! - **geography** / **country**: join identifiers
//! - **unified**: the multi-level output record
//! - **context** / **classify**: national risk context and threshold policies

pub mod classify;
pub mod context;
pub mod country;
pub mod error;
pub mod geography;
pub mod record;
pub mod source;
pub mod unified;
pub mod value;

pub use classify::{HungerStatus, RiskStatus};
pub use context::RiskContext;
pub use country::{CountryCode, country_code_field, normalize_country_name};
pub use error::{ModelError, Result};
pub use geography::{GeographyKey, normalize_place_code, normalize_place_name};
pub use record::{CleanRecord, CleanTable, RawRow, SourceStats};
pub use source::{RowFilterPolicy, SourceDescriptor, SourceKind};
pub use unified::{CountryIdentity, FactRow, RecordLevel, UnifiedRecord};
pub use value::{Value, format_number};
