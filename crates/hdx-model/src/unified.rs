//! Multi-level unified output records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::country::CountryCode;
use crate::geography::GeographyKey;
use crate::value::Value;

pub const RECORD_LEVEL: &str = "record_level";
pub const ISO3: &str = "iso3";
pub const COUNTRY_CODE_ISO2: &str = "country_code_iso2";
pub const COUNTRY_NAME: &str = "country_name";
pub const STATE_NAME: &str = "state_name";
pub const STATE_PCODE: &str = "state_pcode";
pub const COUNTY_NAME: &str = "county_name";
pub const COUNTY_PCODE: &str = "county_pcode";

/// Geography columns; null on national rows.
pub const GEOGRAPHY_COLUMNS: [&str; 4] = [STATE_NAME, STATE_PCODE, COUNTY_NAME, COUNTY_PCODE];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordLevel {
    County,
    National,
}

impl RecordLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::County => "county",
            Self::National => "national",
        }
    }
}

impl fmt::Display for RecordLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Country-level identifiers shared by both record levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryIdentity {
    pub iso3: CountryCode,
    pub iso2: String,
    pub name: String,
}

/// Fact column name to value.
pub type FactRow = BTreeMap<String, Value>;

/// One row of the unified output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record_level", rename_all = "lowercase")]
pub enum UnifiedRecord {
    County {
        geography: GeographyKey,
        country: CountryIdentity,
        facts: FactRow,
    },
    National {
        country: CountryIdentity,
        facts: FactRow,
    },
}

impl UnifiedRecord {
    pub fn level(&self) -> RecordLevel {
        match self {
            Self::County { .. } => RecordLevel::County,
            Self::National { .. } => RecordLevel::National,
        }
    }

    pub fn country(&self) -> &CountryIdentity {
        match self {
            Self::County { country, .. } | Self::National { country, .. } => country,
        }
    }

    pub fn facts(&self) -> &FactRow {
        match self {
            Self::County { facts, .. } | Self::National { facts, .. } => facts,
        }
    }

    pub fn geography(&self) -> Option<&GeographyKey> {
        match self {
            Self::County { geography, .. } => Some(geography),
            Self::National { .. } => None,
        }
    }

    /// Value of any output column, including identity and geography columns.
    pub fn value(&self, column: &str) -> Value {
        let country = self.country();
        match column {
            RECORD_LEVEL => Value::text(self.level().as_str()),
            ISO3 => Value::text(country.iso3.as_str()),
            COUNTRY_CODE_ISO2 => Value::text(country.iso2.clone()),
            COUNTRY_NAME => Value::text(country.name.clone()),
            STATE_NAME | STATE_PCODE | COUNTY_NAME | COUNTY_PCODE => {
                let Some(geo) = self.geography() else {
                    return Value::Null;
                };
                let raw = match column {
                    STATE_NAME => &geo.state_name,
                    STATE_PCODE => &geo.state_pcode,
                    COUNTY_NAME => &geo.county_name,
                    _ => &geo.county_pcode,
                };
                Value::text(raw.clone())
            }
            other => self.facts().get(other).cloned().unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> CountryIdentity {
        CountryIdentity {
            iso3: CountryCode::parse("SSD").unwrap(),
            iso2: "SS".into(),
            name: "South Sudan".into(),
        }
    }

    #[test]
    fn national_rows_have_null_geography() {
        let mut facts = FactRow::new();
        facts.insert("population_2025_total".into(), Value::number(150.0));
        let record = UnifiedRecord::National {
            country: identity(),
            facts,
        };
        assert_eq!(record.level(), RecordLevel::National);
        assert!(record.value(COUNTY_NAME).is_null());
        assert_eq!(record.value(RECORD_LEVEL), Value::text("national"));
        assert_eq!(record.value("population_2025_total").as_f64(), Some(150.0));
        assert!(record.value("unknown").is_null());
    }

    #[test]
    fn county_rows_expose_geography() {
        let record = UnifiedRecord::County {
            geography: GeographyKey::new("Jonglei", "SS03", "Bor South", "SS0301"),
            country: identity(),
            facts: FactRow::new(),
        };
        assert_eq!(record.value(STATE_PCODE), Value::text("SS03"));
        assert_eq!(record.value(ISO3), Value::text("SSD"));
    }

    #[test]
    fn county_level_sorts_first() {
        assert!(RecordLevel::County < RecordLevel::National);
        assert_eq!(RecordLevel::National.to_string(), "national");
    }
}
