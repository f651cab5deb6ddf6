//! Country code resolution.
//!
//! Resolution order is fixed: numeric registry code, then the registry name
//! index, then the manual alias table. Aliases only answer names the
//! registry cannot.

use std::collections::BTreeMap;

use hdx_model::{CountryCode, normalize_country_name};
use hdx_standards::{AliasTable, CountryRegistry};
use serde::Serialize;

/// How a code was (or was not) obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Numeric(CountryCode),
    Name(CountryCode),
    Alias(CountryCode),
    Unresolved,
}

impl Resolution {
    pub fn code(self) -> Option<CountryCode> {
        match self {
            Self::Numeric(code) | Self::Name(code) | Self::Alias(code) => Some(code),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

/// Digits of `raw`, left-padded to three places.
///
/// Returns `None` when `raw` holds no digit.
pub fn numeric_key(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{digits:0>3}"))
    }
}

#[derive(Debug, Clone)]
pub struct CountryResolver {
    registry: CountryRegistry,
    names: BTreeMap<String, CountryCode>,
    aliases: AliasTable,
}

impl CountryResolver {
    /// Build the name index once per run.
    pub fn new(registry: &CountryRegistry, aliases: &AliasTable) -> Self {
        Self {
            registry: registry.clone(),
            names: registry.name_index(),
            aliases: aliases.clone(),
        }
    }

    /// Resolve a numeric region code and/or a free-text name.
    pub fn resolve(&self, code: &str, name: &str) -> Resolution {
        if let Some(entry) = numeric_key(code).and_then(|key| self.registry.by_numeric(&key)) {
            return Resolution::Numeric(entry.alpha3);
        }
        self.resolve_name(name)
    }

    pub fn resolve_name(&self, name: &str) -> Resolution {
        let key = normalize_country_name(name);
        if key.is_empty() {
            return Resolution::Unresolved;
        }
        if let Some(found) = self.names.get(&key) {
            return Resolution::Name(*found);
        }
        match self.aliases.get(&key) {
            Some(code) => Resolution::Alias(code),
            None => Resolution::Unresolved,
        }
    }
}

/// Label used in the unmapped tally for rows without a name.
pub const BLANK_NAME: &str = "(blank)";

/// Diagnostic tally of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionStats {
    pub total: usize,
    pub mapped: usize,
    pub by_numeric: usize,
    pub by_name: usize,
    pub by_alias: usize,
    /// Raw unmapped name to occurrence count.
    pub unmapped: BTreeMap<String, usize>,
}

impl ResolutionStats {
    pub fn record(&mut self, raw_name: &str, resolution: Resolution) {
        self.total += 1;
        match resolution {
            Resolution::Numeric(_) => self.by_numeric += 1,
            Resolution::Name(_) => self.by_name += 1,
            Resolution::Alias(_) => self.by_alias += 1,
            Resolution::Unresolved => {
                let name = raw_name.trim();
                let key = if name.is_empty() { BLANK_NAME } else { name };
                *self.unmapped.entry(key.to_string()).or_default() += 1;
                return;
            }
        }
        self.mapped += 1;
    }

    pub fn mapped_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mapped as f64 / self.total as f64 * 100.0
        }
    }

    /// Most frequent unmapped names: count descending, then name ascending.
    pub fn top_unmapped(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut names: Vec<(&str, usize)> = self
            .unmapped
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        names.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        names.truncate(limit);
        names
    }
}
