//! Locating and reading build inputs from a data directory.
//!
//! Sources are searched in `<data>/clean/` first, then `<data>/`. Files
//! found under `clean/` are canonicalized copies and are read with
//! [`SourceDescriptor::for_clean_copy`].

use std::path::{Path, PathBuf};

use hdx_ingest::{IngestError, canonicalize_file, file_name, locate_source};
use hdx_model::SourceDescriptor;
use hdx_standards::{SourceCatalog, Standards};

use crate::enrich::{ENRICHED_SOURCE_ID, enrich_demographics};
use crate::error::{Result, TransformError};
use crate::resolve::{CountryResolver, ResolutionStats};
use crate::unify::{BuildInputs, SourceTable};

/// Name of the directory holding canonicalized copies.
pub const CLEAN_DIR_NAME: &str = "clean";

pub const BASE_SOURCE_ID: &str = "admin_boundaries";
pub const DEMOGRAPHIC_SOURCE_ID: &str = "demographic";
pub const RISK_SOURCE_ID: &str = "risk_context";

pub fn clean_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(CLEAN_DIR_NAME)
}

/// Whether `path` sits in a `clean/` directory.
pub fn is_clean_copy(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == CLEAN_DIR_NAME)
}

/// Canonicalize `path`, adjusting the descriptor for clean copies.
pub fn read_source(path: &Path, descriptor: &SourceDescriptor) -> Result<SourceTable> {
    let table = if is_clean_copy(path) {
        canonicalize_file(path, &descriptor.for_clean_copy())?
    } else {
        canonicalize_file(path, descriptor)?
    };
    Ok(SourceTable::new(table, file_name(path)))
}

fn descriptor<'a>(catalog: &'a SourceCatalog, id: &str) -> Result<&'a SourceDescriptor> {
    catalog
        .get(id)
        .ok_or_else(|| TransformError::UnknownSource { id: id.to_string() })
}

/// Locate and read the catalog source `id`; `None` when no directory holds it.
pub fn find_source(dirs: &[&Path], catalog: &SourceCatalog, id: &str) -> Result<Option<SourceTable>> {
    let descriptor = descriptor(catalog, id)?;
    match locate_source(dirs, descriptor)? {
        Some(path) => read_source(&path, descriptor).map(Some),
        None => Ok(None),
    }
}

/// Parent directory of `path`; a bare relative name has `.` as its parent.
pub fn parent_dir(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(Path::new(".")),
        other => other,
    }
}

fn describe_dirs(dirs: &[&Path]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build inputs plus the resolution tally when demographics were enriched in memory.
#[derive(Debug, Clone)]
pub struct LoadedInputs {
    pub inputs: BuildInputs,
    pub resolution: Option<ResolutionStats>,
}

/// Read every build input under `data_dir`.
///
/// The base geography is mandatory. The risk context is read from
/// `risk_override` when given, otherwise searched like any source and then
/// in the parent of `data_dir`.
pub fn load_inputs(
    data_dir: &Path,
    standards: &Standards,
    resolver: &CountryResolver,
    risk_override: Option<&Path>,
) -> Result<LoadedInputs> {
    if !data_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: data_dir.to_path_buf(),
        }
        .into());
    }
    let clean = clean_dir(data_dir);
    let dirs: [&Path; 2] = [&clean, data_dir];
    let catalog = &standards.catalog;

    let base = find_source(&dirs, catalog, BASE_SOURCE_ID)?.ok_or_else(|| {
        TransformError::MissingSource {
            id: BASE_SOURCE_ID.to_string(),
            searched: describe_dirs(&dirs),
        }
    })?;
    let mut inputs = BuildInputs::from_base(base);
    inputs.population = find_source(&dirs, catalog, "population")?;
    inputs.nutrition = find_source(&dirs, catalog, "nutrition")?;
    inputs.facilities = find_source(&dirs, catalog, "facilities")?;
    inputs.markets = find_source(&dirs, catalog, "markets")?;
    inputs.mobility = find_source(&dirs, catalog, "mobility")?;

    let mut resolution = None;
    inputs.demographics = match find_source(&dirs, catalog, ENRICHED_SOURCE_ID)? {
        Some(enriched) => Some(enriched),
        None => match find_source(&dirs, catalog, DEMOGRAPHIC_SOURCE_ID)? {
            Some(raw) => {
                tracing::info!(file = %raw.file, "enriching demographic source in memory");
                let enriched = enrich_demographics(&raw.table, resolver, true);
                resolution = Some(enriched.stats);
                Some(SourceTable::new(enriched.table, raw.file))
            }
            None => None,
        },
    };

    inputs.risk_context = match risk_override {
        Some(path) => {
            if !path.is_file() {
                return Err(IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Some(read_source(path, descriptor(catalog, RISK_SOURCE_ID)?)?)
        }
        None => {
            let mut risk_dirs = dirs.to_vec();
            risk_dirs.extend(parent_dir(data_dir));
            find_source(&risk_dirs, catalog, RISK_SOURCE_ID)?
        }
    };

    Ok(LoadedInputs { inputs, resolution })
}
