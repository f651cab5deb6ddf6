//! All-or-nothing file materialization.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use hdx_model::CleanTable;

use crate::error::{IngestError, Result};

/// Temporary sibling used while `path` is being written.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `path` through a temporary file renamed into place on success.
///
/// The temporary file is removed when `write` fails, so a failed run never
/// leaves partial output behind.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IngestError::FileWrite {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let temp_path = temp_path_for(path);
    let result = write_temp(&temp_path, write).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| IngestError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source: e,
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_temp<F>(temp_path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let file = File::create(temp_path).map_err(|e| IngestError::FileWrite {
        operation: "create",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush().map_err(|e| IngestError::FileWrite {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| IngestError::FileWrite {
            operation: "sync",
            path: temp_path.to_path_buf(),
            source: e,
        })
}

/// Write header plus rows as CSV.
pub fn write_csv_rows<'a, I>(path: &Path, headers: &[String], rows: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    write_atomic(path, |out| {
        let csv_error = |e: csv::Error| IngestError::FileWrite {
            operation: "write",
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        };
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(headers).map_err(csv_error)?;
        for row in rows {
            writer.write_record(&row).map_err(csv_error)?;
        }
        writer.flush().map_err(|e| IngestError::FileWrite {
            operation: "write",
            path: path.to_path_buf(),
            source: e,
        })
    })
}

/// Write a clean table with its canonical header order.
pub fn write_clean_table(path: &Path, table: &CleanTable) -> Result<()> {
    write_csv_rows(path, &table.headers, table.ordered_rows())?;
    tracing::debug!(path = %path.display(), rows = table.len(), "wrote clean table");
    Ok(())
}

/// Write every `(file name, table)` pair into `dir`, all or nothing.
///
/// Tables are written into a staging sibling of `dir` first and moved into
/// `dir` only after every table was written. On failure the staging
/// directory is removed and `dir` is left untouched.
pub fn write_clean_tables(dir: &Path, tables: &[(&str, &CleanTable)]) -> Result<Vec<PathBuf>> {
    let staging = temp_path_for(dir);
    remove_staging(&staging)?;

    let staged: Result<Vec<PathBuf>> = tables
        .iter()
        .map(|(name, table)| {
            let path = staging.join(name);
            write_clean_table(&path, table)?;
            Ok(path)
        })
        .collect();
    let staged = match staged {
        Ok(staged) => staged,
        Err(err) => {
            let _ = fs::remove_dir_all(&staging);
            return Err(err);
        }
    };

    fs::create_dir_all(dir).map_err(|e| IngestError::FileWrite {
        operation: "create directory",
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut written = Vec::with_capacity(staged.len());
    for (staged_path, (name, _)) in staged.iter().zip(tables) {
        let target = dir.join(name);
        fs::rename(staged_path, &target).map_err(|e| IngestError::AtomicWriteFailed {
            temp_path: staged_path.clone(),
            target_path: target.clone(),
            source: e,
        })?;
        written.push(target);
    }
    remove_staging(&staging)?;
    Ok(written)
}

fn remove_staging(staging: &Path) -> Result<()> {
    if !staging.exists() {
        return Ok(());
    }
    fs::remove_dir_all(staging).map_err(|e| IngestError::FileWrite {
        operation: "remove staging directory",
        path: staging.to_path_buf(),
        source: e,
    })
}
