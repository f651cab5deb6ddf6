//! Demographic series label to output column map.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{StandardsError, read_toml};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SeriesMap {
    #[serde(default)]
    series: BTreeMap<String, String>,
}

impl SeriesMap {
    pub fn column_for(&self, series: &str) -> Option<&str> {
        self.series.get(series.trim()).map(String::as_str)
    }

    /// Output columns in a stable order.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.series.values().map(String::as_str).collect();
        columns.sort_unstable();
        columns.dedup();
        columns
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<(String, String)> for SeriesMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

pub fn load_series_map(path: &Path) -> Result<SeriesMap, StandardsError> {
    let map: SeriesMap = read_toml(path)?;
    if let Some((label, _)) = map.series.iter().find(|(_, column)| column.trim().is_empty()) {
        return Err(StandardsError::invalid(
            path,
            format!("series {label:?} maps to an empty column name"),
        ));
    }
    Ok(map)
}
