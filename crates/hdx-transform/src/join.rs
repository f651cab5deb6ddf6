//! Left joins of per-geography fact tables onto the base geography.

use std::collections::BTreeMap;

use hdx_model::{CountryCode, FactRow, GeographyKey, Value, normalize_place_code};
use serde::Serialize;

/// Join key declared by a fact table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// State code plus county code, compared exactly.
    CodePair,
    /// County code, trimmed and uppercased.
    CountyCode,
    /// Normalized lowercase county name, for sources without codes.
    CountyName,
    /// Country alpha-3 code.
    Country,
}

impl JoinKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodePair => "state_pcode+county_pcode",
            Self::CountyCode => "county_pcode",
            Self::CountyName => "county_name_norm",
            Self::Country => "iso3",
        }
    }

    /// Key value of a base row under this key.
    pub fn key_for(self, geography: &GeographyKey, country: CountryCode) -> KeyValue {
        match self {
            Self::CodePair => {
                let (state, county) = geography.code_pair();
                KeyValue::CodePair(state, county)
            }
            Self::CountyCode => KeyValue::CountyCode(normalize_place_code(&geography.county_pcode)),
            Self::CountyName => KeyValue::CountyName(geography.county_name_norm()),
            Self::Country => KeyValue::Country(country),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyValue {
    CodePair(String, String),
    CountyCode(String),
    CountyName(String),
    Country(CountryCode),
}

/// One auxiliary table reduced to a single row per key.
#[derive(Debug, Clone)]
pub struct FactTable {
    pub name: String,
    pub key: JoinKey,
    /// Columns this table contributes, in output order.
    pub columns: Vec<String>,
    pub rows: BTreeMap<KeyValue, FactRow>,
    /// File the table was read from; `None` when the source was absent.
    pub source_file: Option<String>,
    /// Rows ignored because an earlier row had the same key.
    pub duplicates: usize,
}

impl FactTable {
    pub fn new(name: impl Into<String>, key: JoinKey, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            key,
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: BTreeMap::new(),
            source_file: None,
            duplicates: 0,
        }
    }

    pub fn with_source_file(mut self, file: impl Into<String>) -> Self {
        self.source_file = Some(file.into());
        self
    }

    /// Insert unless the key is already present; the first row wins.
    pub fn insert_first(&mut self, key: KeyValue, row: FactRow) -> bool {
        if self.rows.contains_key(&key) {
            self.duplicates += 1;
            return false;
        }
        self.rows.insert(key, row);
        true
    }

    pub fn get(&self, key: &KeyValue) -> Option<&FactRow> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A base geography row accumulating joined facts.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyRow {
    pub geography: GeographyKey,
    pub facts: FactRow,
}

/// Match accounting for one join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinStats {
    pub table: String,
    pub key: JoinKey,
    pub matched: usize,
    pub missed: usize,
}

/// Left-join `table` onto `rows` in place.
///
/// Every row keeps its position. Unmatched rows get an explicit null for
/// each of the table's columns, so the output shape never depends on
/// match success.
pub fn left_join(rows: &mut [CountyRow], country: CountryCode, table: &FactTable) -> JoinStats {
    let mut stats = JoinStats {
        table: table.name.clone(),
        key: table.key,
        matched: 0,
        missed: 0,
    };
    for row in rows.iter_mut() {
        let key = table.key.key_for(&row.geography, country);
        match table.get(&key) {
            Some(facts) => {
                stats.matched += 1;
                for column in &table.columns {
                    let value = facts.get(column).cloned().unwrap_or(Value::Null);
                    row.facts.insert(column.clone(), value);
                }
            }
            None => {
                stats.missed += 1;
                for column in &table.columns {
                    row.facts.insert(column.clone(), Value::Null);
                }
            }
        }
    }
    tracing::debug!(
        table = %stats.table,
        key = table.key.as_str(),
        matched = stats.matched,
        missed = stats.missed,
        "joined fact table"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssd() -> CountryCode {
        CountryCode::parse("SSD").unwrap()
    }

    fn base() -> Vec<CountyRow> {
        [
            ("Central Equatoria", "SS01", "Juba", "SS0101"),
            ("Jonglei", "SS03", "Bor South", "SS0301"),
            ("Unity", "SS06", "Rubkona", "SS0608"),
        ]
        .into_iter()
        .map(|(s, sp, c, cp)| CountyRow {
            geography: GeographyKey::new(s, sp, c, cp),
            facts: FactRow::new(),
        })
        .collect()
    }

    fn row(column: &str, value: f64) -> FactRow {
        FactRow::from([(column.to_string(), Value::number(value))])
    }

    #[test]
    fn every_base_row_survives() {
        let mut rows = base();
        let mut table = FactTable::new("nutrition", JoinKey::CodePair, &["proxy_gam_2022_pct"]);
        table.insert_first(
            KeyValue::CodePair("SS01".into(), "SS0101".into()),
            row("proxy_gam_2022_pct", 12.5),
        );
        let stats = left_join(&mut rows, ssd(), &table);
        assert_eq!(rows.len(), 3);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.missed, 2);
        assert_eq!(rows[0].facts["proxy_gam_2022_pct"].as_f64(), Some(12.5));
        assert!(rows[1].facts["proxy_gam_2022_pct"].is_null());
    }

    #[test]
    fn name_key_is_case_insensitive() {
        let mut rows = base();
        let mut table = FactTable::new("markets", JoinKey::CountyName, &["wfp_market_count"]);
        table.insert_first(
            KeyValue::CountyName("bor south".into()),
            row("wfp_market_count", 3.0),
        );
        left_join(&mut rows, ssd(), &table);
        assert_eq!(rows[1].facts["wfp_market_count"].as_f64(), Some(3.0));
    }

    #[test]
    fn first_row_wins_on_duplicate_keys() {
        let mut table = FactTable::new("t", JoinKey::CountyCode, &["x"]);
        assert!(table.insert_first(KeyValue::CountyCode("SS0101".into()), row("x", 1.0)));
        assert!(!table.insert_first(KeyValue::CountyCode("SS0101".into()), row("x", 2.0)));
        assert_eq!(table.duplicates, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn empty_table_nulls_every_row() {
        let mut rows = base();
        let table = FactTable::new("mobility", JoinKey::CountyCode, &["idp_households_est"]);
        let stats = left_join(&mut rows, ssd(), &table);
        assert_eq!(stats.missed, 3);
        assert!(rows.iter().all(|r| r.facts["idp_households_est"].is_null()));
    }

    proptest::proptest! {
        #[test]
        fn join_never_changes_row_count(
            base_codes in proptest::collection::vec("SS[0-9]{4}", 0..24),
            table_codes in proptest::collection::vec("SS[0-9]{4}", 0..24),
        ) {
            let mut rows: Vec<CountyRow> = base_codes
                .iter()
                .map(|code| CountyRow {
                    geography: GeographyKey::new("State", "SS00", "County", code),
                    facts: FactRow::new(),
                })
                .collect();
            let mut table = FactTable::new("t", JoinKey::CountyCode, &["x"]);
            for code in &table_codes {
                table.insert_first(KeyValue::CountyCode(code.clone()), row("x", 1.0));
            }
            let stats = left_join(&mut rows, ssd(), &table);
            proptest::prop_assert_eq!(rows.len(), base_codes.len());
            proptest::prop_assert_eq!(stats.matched + stats.missed, base_codes.len());
            proptest::prop_assert!(rows.iter().all(|r| r.facts.contains_key("x")));
        }
    }
}
