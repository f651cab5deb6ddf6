//! ISO 3166-1 country registry.

use std::collections::BTreeMap;
use std::path::Path;

use hdx_model::{CountryCode, normalize_country_name};

use crate::error::StandardsError;

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryEntry {
    pub alpha2: String,
    pub alpha3: CountryCode,
    /// Zero-padded three-digit numeric code.
    pub numeric: String,
    pub name: String,
    pub official_name: Option<String>,
    pub common_name: Option<String>,
}

impl CountryEntry {
    /// Every name this entry is known by, short name first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.official_name.as_deref())
            .chain(self.common_name.as_deref())
    }
}

/// The standard registry, indexed by numeric code.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    entries: Vec<CountryEntry>,
    by_numeric: BTreeMap<String, usize>,
}

impl CountryRegistry {
    /// The first entry wins when two share a numeric code.
    pub fn from_entries(entries: Vec<CountryEntry>) -> Self {
        let mut by_numeric = BTreeMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            by_numeric.entry(entry.numeric.clone()).or_insert(idx);
        }
        Self {
            entries,
            by_numeric,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CountryEntry> {
        self.entries.iter()
    }

    /// Look up a zero-padded three-digit numeric code.
    pub fn by_numeric(&self, numeric: &str) -> Option<&CountryEntry> {
        self.by_numeric.get(numeric).map(|&i| &self.entries[i])
    }

    /// Normalized name to alpha-3 for every name of every entry.
    ///
    /// Later entries win when two countries share a normalized name.
    pub fn name_index(&self) -> BTreeMap<String, CountryCode> {
        let mut index = BTreeMap::new();
        for entry in &self.entries {
            for name in entry.names() {
                let key = normalize_country_name(name);
                if !key.is_empty() {
                    index.insert(key, entry.alpha3);
                }
            }
        }
        index
    }
}

pub fn parse_iso3166_csv(path: &Path) -> Result<CountryRegistry, StandardsError> {
    let bytes = std::fs::read(path).map_err(|e| StandardsError::io(path, e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes.as_slice());
    let headers = reader
        .headers()
        .map_err(|e| StandardsError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();

    let mut entries = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| StandardsError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let get = |name: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
        };

        let alpha3_raw = get("alpha3").unwrap_or_default();
        let alpha3 = CountryCode::parse(&alpha3_raw).ok_or_else(|| StandardsError::Csv {
            path: path.to_path_buf(),
            message: format!("invalid alpha3 code {alpha3_raw:?}"),
        })?;
        let numeric = get("numeric")
            .filter(|n| n.len() == 3 && n.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| StandardsError::Csv {
                path: path.to_path_buf(),
                message: format!("invalid numeric code for {alpha3}"),
            })?;
        let name = get("name").ok_or_else(|| StandardsError::Csv {
            path: path.to_path_buf(),
            message: format!("missing name for {alpha3}"),
        })?;

        entries.push(CountryEntry {
            alpha2: get("alpha2").unwrap_or_default(),
            alpha3,
            numeric,
            name,
            official_name: get("official_name"),
            common_name: get("common_name"),
        });
    }

    tracing::debug!(path = %path.display(), countries = entries.len(), "loaded country registry");
    Ok(CountryRegistry::from_entries(entries))
}
