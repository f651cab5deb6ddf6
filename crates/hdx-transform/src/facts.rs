//! Builders that reduce clean source tables to one fact row per join key.
//!
//! Keyed sources keep their first row per key; grouped sources aggregate
//! every row of a key. Either way a later join cannot multiply base rows.

use std::collections::BTreeMap;

use hdx_model::{
    CleanRecord, CleanTable, CountryCode, FactRow, HungerStatus, RiskContext, Value,
    normalize_place_code, normalize_place_name,
};
use hdx_standards::{SeriesMap, TrackedCountries};

use crate::columns;
use crate::error::{Result, TransformError};
use crate::join::{FactTable, JoinKey, KeyValue};
use crate::resolve::CountryResolver;
use crate::rollup::{null_safe_mean, null_safe_sum, ratio_pct};

pub const POPULATION_TABLE: &str = "population";
pub const NUTRITION_TABLE: &str = "nutrition";
pub const FACILITIES_TABLE: &str = "facilities";
pub const MARKETS_TABLE: &str = "markets";
pub const MOBILITY_TABLE: &str = "mobility";
pub const COUNTRY_TABLE: &str = "country";

/// Parse a clean cell as a number; blank or malformed cells are `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number(row: &CleanRecord, column: &str) -> Option<f64> {
    parse_number(row.get(column))
}

fn require_columns(table: &CleanTable, required: &[&str]) -> Result<()> {
    match required.iter().find(|c| !table.has_column(c)) {
        Some(column) => Err(TransformError::MissingColumn {
            table: table.source_id.clone(),
            column: (*column).to_string(),
        }),
        None => Ok(()),
    }
}

/// Group rows by a derived key, skipping rows whose key is blank.
fn group_rows<'a, F>(table: &'a CleanTable, key: F) -> BTreeMap<String, Vec<&'a CleanRecord>>
where
    F: Fn(&CleanRecord) -> String,
{
    let mut groups: BTreeMap<String, Vec<&CleanRecord>> = BTreeMap::new();
    for row in &table.rows {
        let key = key(row);
        if key.is_empty() {
            continue;
        }
        groups.entry(key).or_default().push(row);
    }
    groups
}

fn code_pair_key(row: &CleanRecord) -> Option<KeyValue> {
    let state = row.get("state_pcode").trim();
    let county = row.get("county_pcode").trim();
    if county.is_empty() {
        None
    } else {
        Some(KeyValue::CodePair(state.to_string(), county.to_string()))
    }
}

/// County population with sex totals and shares.
pub fn population_facts(table: &CleanTable) -> Result<FactTable> {
    require_columns(table, &["state_pcode", "county_pcode", columns::POPULATION_TOTAL])?;
    let mut facts = FactTable::new(POPULATION_TABLE, JoinKey::CodePair, &columns::POPULATION_COLUMNS);

    for row in &table.rows {
        let Some(key) = code_pair_key(row) else {
            continue;
        };
        let mut values = FactRow::new();
        for column in &columns::POPULATION_COLUMNS[..9] {
            values.insert((*column).to_string(), Value::from_option(number(row, column)));
        }
        let male = null_safe_sum(columns::MALE_BANDS.iter().map(|c| number(row, c)));
        let female = null_safe_sum(columns::FEMALE_BANDS.iter().map(|c| number(row, c)));
        let total = number(row, columns::POPULATION_TOTAL);
        values.insert(columns::MALE_TOTAL.to_string(), Value::from_option(male));
        values.insert(columns::FEMALE_TOTAL.to_string(), Value::from_option(female));
        values.insert(
            columns::FEMALE_SHARE.to_string(),
            Value::from_option(ratio_pct(female, total)),
        );
        values.insert(
            columns::MALE_SHARE.to_string(),
            Value::from_option(ratio_pct(male, total)),
        );
        facts.insert_first(key, values);
    }
    log_duplicates(&facts);
    Ok(facts)
}

/// Malnutrition proxy as a number, with its hunger classification.
pub fn nutrition_facts(table: &CleanTable) -> Result<FactTable> {
    require_columns(table, &["state_pcode", "county_pcode", "proxy_gam_2022"])?;
    let mut facts = FactTable::new(NUTRITION_TABLE, JoinKey::CodePair, &columns::NUTRITION_COLUMNS);

    for row in &table.rows {
        let Some(key) = code_pair_key(row) else {
            continue;
        };
        let gam = parse_number(&row.get("proxy_gam_2022").replace('%', ""));
        let status = HungerStatus::from_proxy_gam(gam);
        let values = FactRow::from([
            (columns::PROXY_GAM.to_string(), Value::from_option(gam)),
            (
                columns::HUNGER_STATUS.to_string(),
                status.map_or(Value::Null, |s| Value::text(s.as_str())),
            ),
        ]);
        facts.insert_first(key, values);
    }
    log_duplicates(&facts);
    Ok(facts)
}

/// Health facility counts and mean coordinates per county code.
pub fn facility_facts(table: &CleanTable) -> Result<FactTable> {
    require_columns(table, &["county_code", "site", "latitude", "longitude"])?;
    let mut facts = FactTable::new(FACILITIES_TABLE, JoinKey::CountyCode, &columns::FACILITY_COLUMNS);

    for (code, rows) in group_rows(table, |row| normalize_place_code(row.get("county_code"))) {
        let count = rows.iter().filter(|r| r.get_non_empty("site").is_some()).count();
        let values = FactRow::from([
            (columns::HEALTH_FACILITY_COUNT.to_string(), Value::number(count as f64)),
            (
                columns::FACILITY_LATITUDE.to_string(),
                Value::from_option(null_safe_mean(rows.iter().map(|r| number(r, "latitude")))),
            ),
            (
                columns::FACILITY_LONGITUDE.to_string(),
                Value::from_option(null_safe_mean(rows.iter().map(|r| number(r, "longitude")))),
            ),
        ]);
        facts.insert_first(KeyValue::CountyCode(code), values);
    }
    Ok(facts)
}

/// Market counts and mean coordinates per normalized county name.
pub fn market_facts(table: &CleanTable) -> Result<FactTable> {
    require_columns(table, &["admin2", "market_id", "latitude", "longitude"])?;
    let mut facts = FactTable::new(MARKETS_TABLE, JoinKey::CountyName, &columns::MARKET_COLUMNS);

    for (name, rows) in group_rows(table, |row| normalize_place_name(row.get("admin2"))) {
        let count = rows
            .iter()
            .filter(|r| r.get_non_empty("market_id").is_some())
            .count();
        let values = FactRow::from([
            (columns::MARKET_COUNT.to_string(), Value::number(count as f64)),
            (
                columns::MARKET_LATITUDE.to_string(),
                Value::from_option(null_safe_mean(rows.iter().map(|r| number(r, "latitude")))),
            ),
            (
                columns::MARKET_LONGITUDE.to_string(),
                Value::from_option(null_safe_mean(rows.iter().map(|r| number(r, "longitude")))),
            ),
        ]);
        facts.insert_first(KeyValue::CountyName(name), values);
    }
    Ok(facts)
}

const MOBILITY_SOURCE_COLUMNS: [(&str, &str); 4] = [
    ("a_idp_hhs_ssd", columns::IDP_HOUSEHOLDS),
    ("a_idp_inds_ssd", columns::IDP_INDIVIDUALS),
    ("i_returnees_internal_present_ind", columns::RETURNEES_INTERNAL),
    ("k_abroad_ret_ind", columns::RETURNEES_ABROAD),
];

/// Displacement counts summed per county code.
pub fn mobility_facts(table: &CleanTable) -> Result<FactTable> {
    let mut required = vec!["County_INT_PCode"];
    required.extend(MOBILITY_SOURCE_COLUMNS.iter().map(|(source, _)| *source));
    require_columns(table, &required)?;
    let mut facts = FactTable::new(MOBILITY_TABLE, JoinKey::CountyCode, &columns::MOBILITY_COLUMNS);

    for (code, rows) in group_rows(table, |row| normalize_place_code(row.get("County_INT_PCode"))) {
        let values: FactRow = MOBILITY_SOURCE_COLUMNS
            .iter()
            .map(|(source, output)| {
                let sum = null_safe_sum(rows.iter().map(|r| number(r, source)));
                ((*output).to_string(), Value::from_option(sum))
            })
            .collect();
        facts.insert_first(KeyValue::CountyCode(code), values);
    }
    Ok(facts)
}

fn log_duplicates(facts: &FactTable) {
    if facts.duplicates > 0 {
        tracing::warn!(
            table = %facts.name,
            duplicates = facts.duplicates,
            "duplicate join keys; first row kept"
        );
    }
}

/// Latest value per (country, series) from the enriched demographic rows.
///
/// Rows need a valid `iso3`, a mapped series, and a numeric year and value.
/// The latest year wins; on equal years the first row wins.
pub fn demographic_metrics(
    table: &CleanTable,
    series: &SeriesMap,
) -> Result<BTreeMap<CountryCode, FactRow>> {
    require_columns(table, &["iso3", "series", "year", "value"])?;
    let mut latest: BTreeMap<(CountryCode, &str), (f64, f64)> = BTreeMap::new();

    for row in &table.rows {
        let Some(code) = CountryCode::parse(row.get("iso3")) else {
            continue;
        };
        let Some(column) = series.column_for(row.get("series")) else {
            continue;
        };
        let (Some(year), Some(value)) = (number(row, "year"), number(row, "value")) else {
            continue;
        };
        latest
            .entry((code, column))
            .and_modify(|best| {
                if year > best.0 {
                    *best = (year, value);
                }
            })
            .or_insert((year, value));
    }

    let mut metrics: BTreeMap<CountryCode, FactRow> = BTreeMap::new();
    for ((code, column), (_, value)) in latest {
        metrics
            .entry(code)
            .or_default()
            .insert(column.to_string(), Value::number(value));
    }
    tracing::debug!(countries = metrics.len(), "selected latest demographic metrics");
    Ok(metrics)
}

/// Risk context per country; first row per country wins.
///
/// Rows are keyed by `iso3` when the table has one, otherwise by resolving
/// `country_name`.
pub fn risk_contexts(
    table: &CleanTable,
    resolver: &CountryResolver,
) -> Result<BTreeMap<CountryCode, RiskContext>> {
    let by_code = table.has_column("iso3");
    if !by_code {
        require_columns(table, &["country_name"])?;
    }
    let mut contexts = BTreeMap::new();
    let mut duplicates = 0usize;

    for row in &table.rows {
        let code = if by_code {
            CountryCode::parse_lenient(row.get("iso3"))
        } else {
            resolver.resolve_name(row.get("country_name")).code()
        };
        let Some(code) = code else {
            tracing::trace!(country = row.get("country_name"), "risk row without country code");
            continue;
        };
        if contexts.contains_key(&code) {
            duplicates += 1;
            continue;
        }
        contexts.insert(
            code,
            RiskContext {
                iso3: code,
                risk_score: number(row, "risk_score"),
                status: row.get_non_empty("status").map(|s| s.trim().to_string()),
                funding_gap_ratio: number(row, "funding_gap_ratio"),
                flood_area_pct: number(row, "flood_area_pct"),
            },
        );
    }
    if duplicates > 0 {
        tracing::warn!(duplicates, "duplicate risk context rows; first row kept");
    }
    Ok(contexts)
}

/// Country-keyed context: risk context, ethnic descriptors and demographic metrics.
///
/// Every tracked country gets a row. A country without a supplied risk
/// context takes [`RiskContext::unavailable`].
pub fn country_facts(
    tracked: &TrackedCountries,
    risks: &BTreeMap<CountryCode, RiskContext>,
    demographics: &BTreeMap<CountryCode, FactRow>,
    series: &SeriesMap,
) -> FactTable {
    let mut table_columns: Vec<&str> = columns::CONTEXT_COLUMNS.to_vec();
    let series_columns = series.columns();
    table_columns.extend(series_columns.iter().copied());
    let mut facts = FactTable::new(COUNTRY_TABLE, JoinKey::Country, &table_columns);

    for country in tracked.iter() {
        let code = country.alpha3;
        let risk = risks
            .get(&code)
            .cloned()
            .unwrap_or_else(|| RiskContext::unavailable(code));
        let text = |value: &Option<String>| value.as_deref().map_or(Value::Null, Value::text);

        let mut values = FactRow::from([
            (columns::RISK_SCORE.to_string(), Value::from_option(risk.risk_score)),
            (
                columns::RISK_STATUS.to_string(),
                risk.effective_status().map_or(Value::Null, Value::text),
            ),
            (
                columns::FUNDING_GAP.to_string(),
                Value::from_option(risk.funding_gap_ratio),
            ),
            (columns::FLOOD_AREA.to_string(), Value::from_option(risk.flood_area_pct)),
            (columns::ETHNIC_SUMMARY.to_string(), text(&country.ethnic_groups_summary)),
            (columns::ETHNIC_NOTE.to_string(), text(&country.ethnic_estimates_note)),
            (columns::ETHNIC_SOURCE.to_string(), text(&country.ethnic_source_url)),
        ]);
        let metrics = demographics.get(&code);
        for column in &series_columns {
            let value = metrics
                .and_then(|m| m.get(*column))
                .cloned()
                .unwrap_or(Value::Null);
            values.insert((*column).to_string(), value);
        }
        facts.insert_first(KeyValue::Country(code), values);
    }
    facts
}
