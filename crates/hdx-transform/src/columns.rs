//! Unified output column names and order.

use hdx_model::unified::{
    COUNTRY_CODE_ISO2, COUNTRY_NAME, COUNTY_NAME, COUNTY_PCODE, ISO3, RECORD_LEVEL, STATE_NAME,
    STATE_PCODE,
};
use hdx_standards::SeriesMap;

pub const COUNTY_AREA: &str = "county_area_sqkm";

pub const POPULATION_TOTAL: &str = "population_2025_total";
pub const MALE_UNDER5: &str = "male_under5_n";
pub const FEMALE_UNDER5: &str = "female_under5_n";
pub const MALE_5_17: &str = "male_5_17_n";
pub const FEMALE_5_17: &str = "female_5_17_n";
pub const MALE_18_60: &str = "male_18_60_n";
pub const FEMALE_18_60: &str = "female_18_60_n";
pub const MALE_OVER60: &str = "male_over60_n";
pub const FEMALE_OVER60: &str = "female_over60_n";
pub const MALE_TOTAL: &str = "male_total_n";
pub const FEMALE_TOTAL: &str = "female_total_n";
pub const FEMALE_SHARE: &str = "female_share_pct";
pub const MALE_SHARE: &str = "male_share_pct";

pub const MALE_BANDS: [&str; 4] = [MALE_UNDER5, MALE_5_17, MALE_18_60, MALE_OVER60];
pub const FEMALE_BANDS: [&str; 4] = [FEMALE_UNDER5, FEMALE_5_17, FEMALE_18_60, FEMALE_OVER60];

pub const PROXY_GAM: &str = "proxy_gam_2022_pct";
pub const HUNGER_STATUS: &str = "hunger_status";

pub const HEALTH_FACILITY_COUNT: &str = "health_facility_count";
pub const FACILITY_LATITUDE: &str = "avg_facility_latitude";
pub const FACILITY_LONGITUDE: &str = "avg_facility_longitude";

pub const MARKET_COUNT: &str = "wfp_market_count";
pub const MARKET_LATITUDE: &str = "avg_market_latitude";
pub const MARKET_LONGITUDE: &str = "avg_market_longitude";

pub const IDP_HOUSEHOLDS: &str = "idp_households_est";
pub const IDP_INDIVIDUALS: &str = "idp_individuals_est";
pub const RETURNEES_INTERNAL: &str = "returnees_internal_ind_est";
pub const RETURNEES_ABROAD: &str = "returnees_from_abroad_ind_est";

pub const RISK_SCORE: &str = "national_risk_score";
pub const RISK_STATUS: &str = "national_status";
pub const FUNDING_GAP: &str = "national_funding_gap_ratio";
pub const FLOOD_AREA: &str = "national_flood_area_pct";

pub const ETHNIC_SUMMARY: &str = "ethnic_groups_summary";
pub const ETHNIC_NOTE: &str = "ethnic_estimates_note";
pub const ETHNIC_SOURCE: &str = "ethnic_source_url";

pub const DATA_SOURCES: &str = "data_sources";

pub const POPULATION_COLUMNS: [&str; 13] = [
    POPULATION_TOTAL,
    MALE_UNDER5,
    FEMALE_UNDER5,
    MALE_5_17,
    FEMALE_5_17,
    MALE_18_60,
    FEMALE_18_60,
    MALE_OVER60,
    FEMALE_OVER60,
    MALE_TOTAL,
    FEMALE_TOTAL,
    FEMALE_SHARE,
    MALE_SHARE,
];
pub const NUTRITION_COLUMNS: [&str; 2] = [PROXY_GAM, HUNGER_STATUS];
pub const FACILITY_COLUMNS: [&str; 3] = [HEALTH_FACILITY_COUNT, FACILITY_LATITUDE, FACILITY_LONGITUDE];
pub const MARKET_COLUMNS: [&str; 3] = [MARKET_COUNT, MARKET_LATITUDE, MARKET_LONGITUDE];
pub const MOBILITY_COLUMNS: [&str; 4] = [
    IDP_HOUSEHOLDS,
    IDP_INDIVIDUALS,
    RETURNEES_INTERNAL,
    RETURNEES_ABROAD,
];
pub const CONTEXT_COLUMNS: [&str; 7] = [
    RISK_SCORE,
    RISK_STATUS,
    FUNDING_GAP,
    FLOOD_AREA,
    ETHNIC_SUMMARY,
    ETHNIC_NOTE,
    ETHNIC_SOURCE,
];

/// Columns whose national value is the null-safe sum of the county values.
pub const NATIONAL_SUM_COLUMNS: [&str; 10] = [
    COUNTY_AREA,
    POPULATION_TOTAL,
    MALE_TOTAL,
    FEMALE_TOTAL,
    HEALTH_FACILITY_COUNT,
    MARKET_COUNT,
    IDP_HOUSEHOLDS,
    IDP_INDIVIDUALS,
    RETURNEES_INTERNAL,
    RETURNEES_ABROAD,
];

/// Sort keys of the unified output, in priority order.
pub const SORT_COLUMNS: [&str; 4] = [RECORD_LEVEL, STATE_NAME, COUNTY_NAME, COUNTY_PCODE];

/// Full header of the unified output.
///
/// Demographic metric columns come from the series map and sit between the
/// country context and `data_sources`.
pub fn output_columns(series: &SeriesMap) -> Vec<String> {
    let fixed_head = [
        RECORD_LEVEL,
        ISO3,
        COUNTRY_CODE_ISO2,
        COUNTRY_NAME,
        STATE_NAME,
        STATE_PCODE,
        COUNTY_NAME,
        COUNTY_PCODE,
        COUNTY_AREA,
    ];
    fixed_head
        .into_iter()
        .chain(POPULATION_COLUMNS)
        .chain(NUTRITION_COLUMNS)
        .chain(FACILITY_COLUMNS)
        .chain(MARKET_COLUMNS)
        .chain(MOBILITY_COLUMNS)
        .chain(CONTEXT_COLUMNS)
        .chain(series.columns())
        .chain([DATA_SOURCES])
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn header_is_unique_and_framed() {
        let series: SeriesMap = [
            ("Total fertility rate (children per women)", "fertility_rate_latest"),
            ("Life expectancy at birth for both sexes (years)", "life_expectancy_years_latest"),
        ]
        .into_iter()
        .map(|(label, column)| (label.to_string(), column.to_string()))
        .collect();
        let columns = output_columns(&series);
        let unique: BTreeSet<&String> = columns.iter().collect();
        assert_eq!(unique.len(), columns.len());
        assert_eq!(columns[0], RECORD_LEVEL);
        assert_eq!(columns.last().map(String::as_str), Some(DATA_SOURCES));
        assert_eq!(columns.len(), 9 + 13 + 2 + 3 + 3 + 4 + 7 + 2 + 1);
    }
}
