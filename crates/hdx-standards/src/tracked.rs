//! Countries represented in the unified output.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hdx_model::{CountryCode, CountryIdentity};
use serde::Deserialize;

use crate::error::{StandardsError, read_toml};

/// Profile of one tracked country.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackedCountry {
    pub alpha3: CountryCode,
    pub alpha2: String,
    pub name: String,
    /// County rows for this country come from the base geography table.
    #[serde(default)]
    pub base: bool,
    pub ethnic_groups_summary: Option<String>,
    pub ethnic_estimates_note: Option<String>,
    pub ethnic_source_url: Option<String>,
    /// Provenance note written on the national row.
    pub data_sources: Option<String>,
    /// National figures used where the county rollup has no observation.
    ///
    /// Keys are output column names; `population_total` is the denominator
    /// for shares when no population column is observed.
    #[serde(default)]
    pub reference: BTreeMap<String, f64>,
}

impl TrackedCountry {
    pub fn identity(&self) -> CountryIdentity {
        CountryIdentity {
            iso3: self.alpha3,
            iso2: self.alpha2.clone(),
            name: self.name.clone(),
        }
    }

    pub fn reference(&self, column: &str) -> Option<f64> {
        self.reference.get(column).copied().filter(|v| v.is_finite())
    }
}

#[derive(Debug, Deserialize)]
struct TrackedFile {
    #[serde(default, rename = "country")]
    countries: Vec<TrackedCountry>,
}

/// Tracked countries in declaration order; exactly one is the base country.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedCountries {
    countries: Vec<TrackedCountry>,
}

impl TrackedCountries {
    /// Build from profiles, checking there is exactly one base country and no duplicates.
    pub fn new(countries: Vec<TrackedCountry>) -> Result<Self, String> {
        let mut seen = BTreeSet::new();
        for country in &countries {
            if !seen.insert(country.alpha3) {
                return Err(format!("duplicate tracked country {}", country.alpha3));
            }
        }
        match countries.iter().filter(|c| c.base).count() {
            1 => Ok(Self { countries }),
            0 => Err("no base country declared".to_string()),
            n => Err(format!("{n} base countries declared, expected one")),
        }
    }

    pub fn base(&self) -> &TrackedCountry {
        // `new` guarantees one base entry.
        self.countries
            .iter()
            .find(|c| c.base)
            .unwrap_or(&self.countries[0])
    }

    pub fn get(&self, code: CountryCode) -> Option<&TrackedCountry> {
        self.countries.iter().find(|c| c.alpha3 == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedCountry> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

pub fn load_tracked_countries(path: &Path) -> Result<TrackedCountries, StandardsError> {
    let file: TrackedFile = read_toml(path)?;
    TrackedCountries::new(file.countries).map_err(|message| StandardsError::invalid(path, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str, base: bool) -> TrackedCountry {
        TrackedCountry {
            alpha3: CountryCode::parse(code).unwrap(),
            alpha2: code[..2].to_string(),
            name: code.to_string(),
            base,
            ethnic_groups_summary: None,
            ethnic_estimates_note: None,
            ethnic_source_url: None,
            data_sources: None,
            reference: BTreeMap::new(),
        }
    }

    #[test]
    fn requires_exactly_one_base() {
        assert!(TrackedCountries::new(vec![country("SSD", true), country("SDN", false)]).is_ok());
        assert!(TrackedCountries::new(vec![country("SDN", false)]).is_err());
        assert!(TrackedCountries::new(vec![country("SSD", true), country("SDN", true)]).is_err());
        assert!(TrackedCountries::new(vec![country("SSD", true), country("SSD", false)]).is_err());
    }
}
