//! Country resolution, fact-table joins and national rollups.
//!
//! The build reads canonicalized sources, reduces each auxiliary source to
//! one fact row per join key, left-joins them onto the base geography,
//! appends one national row per tracked country and writes the sorted
//! result through polars.

pub mod columns;
pub mod enrich;
pub mod error;
pub mod facts;
pub mod inputs;
pub mod join;
pub mod output;
pub mod resolve;
pub mod rollup;
pub mod unify;

pub use enrich::{ENRICHED_COLUMNS, ENRICHED_SOURCE_ID, Enriched, enrich_demographics};
pub use error::{Result, TransformError};
pub use inputs::{
    CLEAN_DIR_NAME, LoadedInputs, clean_dir, find_source, is_clean_copy, load_inputs, read_source,
};
pub use join::{CountyRow, FactTable, JoinKey, JoinStats, KeyValue, left_join};
pub use output::{
    DEFAULT_OUTPUT_NAME, OutputSummary, sha256_file, sort_output, to_dataframe, write_unified,
};
pub use resolve::{CountryResolver, Resolution, ResolutionStats};
pub use rollup::{national_record, null_safe_mean, null_safe_sum, ratio_pct};
pub use unify::{BuildInputs, BuildSummary, SourceTable, UnifiedTable, build_unified};
