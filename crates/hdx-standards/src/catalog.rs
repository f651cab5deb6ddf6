//! Source descriptor catalog.

use std::collections::BTreeSet;
use std::path::Path;

use hdx_model::SourceDescriptor;
use serde::Deserialize;

use crate::error::{StandardsError, read_toml};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "source")]
    sources: Vec<SourceDescriptor>,
}

/// Ordered list of descriptors; the first pattern matching a file name wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceCatalog {
    sources: Vec<SourceDescriptor>,
}

impl SourceCatalog {
    pub fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self { sources }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn find(&self, file_name: &str) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|s| s.matches_file_name(file_name))
    }

    /// Descriptor for `file_name`, or the default descriptor when no entry matches.
    pub fn descriptor_for(&self, file_name: &str) -> SourceDescriptor {
        self.find(file_name)
            .cloned()
            .unwrap_or_else(|| SourceDescriptor::fallback(file_name))
    }
}

pub fn load_source_catalog(path: &Path) -> Result<SourceCatalog, StandardsError> {
    let file: CatalogFile = read_toml(path)?;
    let mut seen = BTreeSet::new();
    for source in &file.sources {
        source
            .validate()
            .map_err(|e| StandardsError::invalid(path, e.to_string()))?;
        if !seen.insert(source.id.as_str()) {
            return Err(StandardsError::invalid(
                path,
                format!("duplicate source id {:?}", source.id),
            ));
        }
    }
    tracing::debug!(path = %path.display(), sources = file.sources.len(), "loaded source catalog");
    Ok(SourceCatalog::new(file.sources))
}
