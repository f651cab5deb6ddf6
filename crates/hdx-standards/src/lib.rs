//! Reference data and configuration for the hdx pipeline.
//!
//! Everything that differs between input sources or countries lives under
//! `standards/` as TOML or CSV and is loaded here once per run.

#![deny(unsafe_code)]

pub mod aliases;
pub mod catalog;
pub mod countries;
pub mod demographics;
pub mod error;
pub mod paths;
pub mod tracked;

use std::path::{Path, PathBuf};

pub use crate::aliases::{AliasTable, load_alias_table};
pub use crate::catalog::{SourceCatalog, load_source_catalog};
pub use crate::countries::{CountryEntry, CountryRegistry, parse_iso3166_csv};
pub use crate::demographics::{SeriesMap, load_series_map};
pub use crate::error::StandardsError;
pub use crate::paths::{STANDARDS_ENV_VAR, standards_root};
pub use crate::tracked::{TrackedCountries, TrackedCountry, load_tracked_countries};

/// All standards files, loaded together.
#[derive(Debug, Clone)]
pub struct Standards {
    pub root: PathBuf,
    pub catalog: SourceCatalog,
    pub countries: CountryRegistry,
    pub aliases: AliasTable,
    pub tracked: TrackedCountries,
    pub series: SeriesMap,
}

impl Standards {
    pub fn load(root: &Path) -> Result<Self, StandardsError> {
        let standards = Self {
            root: root.to_path_buf(),
            catalog: load_source_catalog(&paths::sources_path(root))?,
            countries: parse_iso3166_csv(&paths::iso3166_path(root))?,
            aliases: load_alias_table(&paths::aliases_path(root))?,
            tracked: load_tracked_countries(&paths::tracked_path(root))?,
            series: load_series_map(&paths::demographics_path(root))?,
        };
        tracing::info!(
            root = %root.display(),
            sources = standards.catalog.len(),
            countries = standards.countries.len(),
            aliases = standards.aliases.len(),
            tracked = standards.tracked.len(),
            "loaded standards"
        );
        Ok(standards)
    }

    pub fn load_default() -> Result<Self, StandardsError> {
        Self::load(&standards_root())
    }
}
