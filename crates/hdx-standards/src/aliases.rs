//! Manual country name aliases.

use std::collections::BTreeMap;
use std::path::Path;

use hdx_model::{CountryCode, normalize_country_name};
use serde::Deserialize;

use crate::error::{StandardsError, read_toml};

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

/// Normalized country name to alpha-3, for names the registry does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, CountryCode>,
}

impl AliasTable {
    pub fn new(aliases: BTreeMap<String, CountryCode>) -> Self {
        Self { aliases }
    }

    pub fn get(&self, normalized_name: &str) -> Option<CountryCode> {
        self.aliases.get(normalized_name).copied()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CountryCode)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Load the alias table. Keys are re-normalized so hand-edited entries still match.
pub fn load_alias_table(path: &Path) -> Result<AliasTable, StandardsError> {
    let file: AliasFile = read_toml(path)?;
    let mut aliases = BTreeMap::new();
    for (name, code) in file.aliases {
        let key = normalize_country_name(&name);
        if key.is_empty() {
            return Err(StandardsError::invalid(path, "alias with an empty name"));
        }
        let code = CountryCode::parse(code.trim()).ok_or_else(|| {
            StandardsError::invalid(path, format!("alias {name:?} maps to invalid code {code:?}"))
        })?;
        aliases.insert(key, code);
    }
    Ok(AliasTable::new(aliases))
}
