//! Null-safe aggregation and national rollup rows.

use hdx_model::{FactRow, HungerStatus, UnifiedRecord, Value};
use hdx_standards::TrackedCountry;

use crate::columns;

/// Sum of the present values; `None` when nothing was observed.
pub fn null_safe_sum<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Mean of the present values; `None` when nothing was observed.
pub fn null_safe_mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `numerator / denominator * 100` when both are present and the denominator is non-zero.
pub fn ratio_pct(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d * 100.0),
        _ => None,
    }
}

/// Reference key holding the population denominator for countries without county rows.
pub const REFERENCE_POPULATION: &str = "population_total";

/// Numeric values of `column` across `counties`.
fn column_values<'a>(
    counties: &'a [&'a UnifiedRecord],
    column: &'a str,
) -> impl Iterator<Item = Option<f64>> + 'a {
    counties.iter().map(move |r| r.value(column).as_f64())
}

/// Build the national row of one tracked country.
///
/// `counties` are the country's county records (possibly none).
/// `country_facts` is the country-keyed context row: risk context, ethnic
/// descriptors and demographic metrics.
pub fn national_record(
    tracked: &TrackedCountry,
    counties: &[&UnifiedRecord],
    country_facts: &FactRow,
) -> UnifiedRecord {
    let mut facts = FactRow::new();

    for column in columns::NATIONAL_SUM_COLUMNS {
        let sum = null_safe_sum(column_values(counties, column))
            .or_else(|| tracked.reference(column));
        facts.insert(column.to_string(), Value::from_option(sum));
    }

    let population = facts
        .get(columns::POPULATION_TOTAL)
        .and_then(Value::as_f64)
        .or_else(|| tracked.reference(REFERENCE_POPULATION));
    let male = facts.get(columns::MALE_TOTAL).and_then(Value::as_f64);
    let female = facts.get(columns::FEMALE_TOTAL).and_then(Value::as_f64);
    facts.insert(
        columns::FEMALE_SHARE.to_string(),
        Value::from_option(ratio_pct(female, population)),
    );
    facts.insert(
        columns::MALE_SHARE.to_string(),
        Value::from_option(ratio_pct(male, population)),
    );

    let gam = null_safe_mean(column_values(counties, columns::PROXY_GAM))
        .or_else(|| tracked.reference(columns::PROXY_GAM));
    facts.insert(columns::PROXY_GAM.to_string(), Value::from_option(gam));
    facts.insert(
        columns::HUNGER_STATUS.to_string(),
        HungerStatus::from_proxy_gam(gam).map_or(Value::Null, |s| Value::text(s.as_str())),
    );

    for (column, value) in country_facts {
        facts.insert(column.clone(), value.clone());
    }
    facts.insert(
        columns::DATA_SOURCES.to_string(),
        tracked
            .data_sources
            .as_deref()
            .map_or(Value::Null, Value::text),
    );

    UnifiedRecord::National {
        country: tracked.identity(),
        facts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdx_model::{CountryCode, GeographyKey};
    use std::collections::BTreeMap;

    fn tracked(reference: &[(&str, f64)]) -> TrackedCountry {
        TrackedCountry {
            alpha3: CountryCode::parse("SSD").unwrap(),
            alpha2: "SS".into(),
            name: "South Sudan".into(),
            base: true,
            ethnic_groups_summary: None,
            ethnic_estimates_note: None,
            ethnic_source_url: None,
            data_sources: Some("Aggregated from county rows".into()),
            reference: reference
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn county(pcode: &str, facts: &[(&str, Value)]) -> UnifiedRecord {
        UnifiedRecord::County {
            geography: GeographyKey::new("S", "SS01", pcode, pcode),
            country: tracked(&[]).identity(),
            facts: facts
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn sums_skip_nulls() {
        assert_eq!(null_safe_sum([Some(100.0), None, Some(50.0)]), Some(150.0));
        assert_eq!(null_safe_sum([None, None]), None);
        assert_eq!(null_safe_sum(Vec::<Option<f64>>::new()), None);
        assert_eq!(null_safe_sum([Some(0.0)]), Some(0.0));
    }

    #[test]
    fn column_values_borrow_a_runtime_column_name() {
        let rows = [
            county("A", &[(columns::MARKET_COUNT, Value::number(2.0))]),
            county("B", &[]),
        ];
        let refs: Vec<&UnifiedRecord> = rows.iter().collect();
        let column = String::from(columns::MARKET_COUNT);
        let values: Vec<Option<f64>> = column_values(&refs, &column).collect();
        assert_eq!(values, vec![Some(2.0), None]);
        assert_eq!(null_safe_sum(column_values(&refs, &column)), Some(2.0));
    }

    #[test]
    fn means_and_ratios() {
        assert_eq!(null_safe_mean([Some(10.0), None, Some(20.0)]), Some(15.0));
        assert_eq!(null_safe_mean([None]), None);
        assert_eq!(ratio_pct(Some(25.0), Some(100.0)), Some(25.0));
        assert_eq!(ratio_pct(Some(25.0), Some(0.0)), None);
        assert_eq!(ratio_pct(None, Some(100.0)), None);
        assert_eq!(ratio_pct(Some(1.0), None), None);
    }

    #[test]
    fn national_population_is_null_safe() {
        let rows = [
            county("A", &[(columns::POPULATION_TOTAL, Value::number(100.0))]),
            county("B", &[(columns::POPULATION_TOTAL, Value::Null)]),
            county("C", &[(columns::POPULATION_TOTAL, Value::number(50.0))]),
        ];
        let refs: Vec<&UnifiedRecord> = rows.iter().collect();
        let national = national_record(&tracked(&[]), &refs, &FactRow::new());
        assert_eq!(national.value(columns::POPULATION_TOTAL).as_f64(), Some(150.0));
        assert!(national.value(columns::HEALTH_FACILITY_COUNT).is_null());
        assert!(national.value(hdx_model::unified::COUNTY_NAME).is_null());
    }

    #[test]
    fn all_null_population_stays_null() {
        let rows = [
            county("A", &[(columns::POPULATION_TOTAL, Value::Null)]),
            county("B", &[]),
        ];
        let refs: Vec<&UnifiedRecord> = rows.iter().collect();
        let national = national_record(&tracked(&[]), &refs, &FactRow::new());
        assert!(national.value(columns::POPULATION_TOTAL).is_null());
        assert!(national.value(columns::FEMALE_SHARE).is_null());
    }

    #[test]
    fn reference_figures_fill_missing_rollups() {
        let profile = tracked(&[
            (columns::MALE_TOTAL, 20_857_303.0),
            (columns::FEMALE_TOTAL, 20_281_599.0),
            (REFERENCE_POPULATION, 41_138_904.0),
        ]);
        let national = national_record(&profile, &[], &FactRow::new());
        assert_eq!(national.value(columns::MALE_TOTAL).as_f64(), Some(20_857_303.0));
        let share = national.value(columns::FEMALE_SHARE).as_f64().unwrap();
        assert!((share - 49.300_314).abs() < 1e-3);
        assert!(national.value(columns::POPULATION_TOTAL).is_null());
    }

    #[test]
    fn hunger_status_from_mean_gam() {
        let rows = [
            county("A", &[(columns::PROXY_GAM, Value::number(10.0))]),
            county("B", &[(columns::PROXY_GAM, Value::number(30.0))]),
        ];
        let refs: Vec<&UnifiedRecord> = rows.iter().collect();
        let national = national_record(&tracked(&[]), &refs, &FactRow::new());
        assert_eq!(national.value(columns::PROXY_GAM).as_f64(), Some(20.0));
        assert_eq!(national.value(columns::HUNGER_STATUS), Value::text("yellow"));
    }

    #[test]
    fn country_facts_are_carried() {
        let context = FactRow::from([(
            "national_status".to_string(),
            Value::text("red"),
        )]);
        let national = national_record(&tracked(&[]), &[], &context);
        assert_eq!(national.value("national_status"), Value::text("red"));
        assert_eq!(
            national.value(columns::DATA_SOURCES),
            Value::text("Aggregated from county rows")
        );
    }
}
