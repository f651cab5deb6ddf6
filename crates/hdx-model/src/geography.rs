//! Subnational geography identifiers.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Lowercase, trim and collapse internal whitespace of a place name.
///
/// This is the name key used for joins against sources that carry no codes.
pub fn normalize_place_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim and uppercase an administrative code (`ss0101 ` -> `SS0101`).
pub fn normalize_place_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Composite identifier of a county-level unit.
///
/// Equality compares codes exactly and names through [`normalize_place_name`],
/// so `"Juba"` and `" JUBA "` are the same county when the codes agree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeographyKey {
    pub state_name: String,
    pub state_pcode: String,
    pub county_name: String,
    pub county_pcode: String,
}

impl GeographyKey {
    pub fn new(
        state_name: impl Into<String>,
        state_pcode: impl Into<String>,
        county_name: impl Into<String>,
        county_pcode: impl Into<String>,
    ) -> Self {
        Self {
            state_name: state_name.into(),
            state_pcode: state_pcode.into(),
            county_name: county_name.into(),
            county_pcode: county_pcode.into(),
        }
    }

    /// Normalized lowercase county name used for name-only joins.
    pub fn county_name_norm(&self) -> String {
        normalize_place_name(&self.county_name)
    }

    /// Exact code pair used for composite joins.
    pub fn code_pair(&self) -> (String, String) {
        (self.state_pcode.clone(), self.county_pcode.clone())
    }
}

impl PartialEq for GeographyKey {
    fn eq(&self, other: &Self) -> bool {
        self.state_pcode == other.state_pcode
            && self.county_pcode == other.county_pcode
            && normalize_place_name(&self.state_name) == normalize_place_name(&other.state_name)
            && self.county_name_norm() == other.county_name_norm()
    }
}

impl Eq for GeographyKey {}

impl Hash for GeographyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.state_pcode.hash(state);
        self.county_pcode.hash(state);
        normalize_place_name(&self.state_name).hash(state);
        self.county_name_norm().hash(state);
    }
}
