//! Standards directory path resolution.

use std::path::PathBuf;

/// Environment variable for overriding the standards directory.
pub const STANDARDS_ENV_VAR: &str = "HDX_STANDARDS_DIR";

/// Get the standards root directory.
///
/// Resolution order:
/// 1. `HDX_STANDARDS_DIR` environment variable
/// 2. `standards/` directory relative to workspace root
pub fn standards_root() -> PathBuf {
    if let Ok(root) = std::env::var(STANDARDS_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../standards")
}

pub fn sources_path(root: &std::path::Path) -> PathBuf {
    root.join("sources.toml")
}

pub fn iso3166_path(root: &std::path::Path) -> PathBuf {
    root.join("countries/iso3166.csv")
}

pub fn aliases_path(root: &std::path::Path) -> PathBuf {
    root.join("countries/aliases.toml")
}

pub fn tracked_path(root: &std::path::Path) -> PathBuf {
    root.join("countries/tracked.toml")
}

pub fn demographics_path(root: &std::path::Path) -> PathBuf {
    root.join("demographics.toml")
}
