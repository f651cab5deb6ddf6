//! Input file discovery.

use std::path::{Path, PathBuf};

use hdx_model::SourceDescriptor;

use crate::error::{IngestError, Result};

fn read_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Lists all CSV files in a directory (non-recursive), sorted by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let files: Vec<PathBuf> = read_files(dir)?
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
        })
        .collect();
    if files.is_empty() {
        return Err(IngestError::NoMatchingFiles {
            path: dir.to_path_buf(),
            pattern: "*.csv".to_string(),
        });
    }
    Ok(files)
}

/// First file matching `descriptor`'s pattern, searching `dirs` in order.
///
/// Missing directories are skipped; `None` means no directory holds a match.
pub fn locate_source(dirs: &[&Path], descriptor: &SourceDescriptor) -> Result<Option<PathBuf>> {
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let found = read_files(dir)?.into_iter().find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| descriptor.matches_file_name(name))
        });
        if let Some(path) = found {
            tracing::debug!(source = %descriptor.id, path = %path.display(), "located source");
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// File name of `path` as UTF-8, or an empty string.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), "header\ndata").unwrap();
        }
        dir
    }

    #[test]
    fn test_list_csv_files_sorted() {
        let dir = create_test_dir(&["b.csv", "A.CSV", "notes.txt", "c.xlsx"]);
        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|p| file_name(p)).collect();
        assert_eq!(names, vec!["A.CSV", "b.csv"]);
    }

    #[test]
    fn test_empty_and_missing_directories() {
        let dir = create_test_dir(&["notes.txt"]);
        assert!(matches!(
            list_csv_files(dir.path()),
            Err(IngestError::NoMatchingFiles { .. })
        ));
        assert!(matches!(
            list_csv_files(&dir.path().join("missing")),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_locate_prefers_earlier_directory() {
        let raw = create_test_dir(&["wfp_markets_ssd.csv"]);
        let clean = create_test_dir(&["wfp_markets_ssd.csv"]);
        let descriptor = SourceDescriptor {
            pattern: "wfp_markets_*.csv".to_string(),
            ..SourceDescriptor::fallback("markets")
        };
        let found = locate_source(&[clean.path(), raw.path()], &descriptor)
            .unwrap()
            .unwrap();
        assert!(found.starts_with(clean.path()));

        let missing = SourceDescriptor::fallback("absent.csv");
        assert_eq!(locate_source(&[raw.path()], &missing).unwrap(), None);
    }
}
