//! Assembly of the unified county + national table.

use hdx_model::{CleanTable, FactRow, UnifiedRecord, Value};
use hdx_standards::Standards;
use serde::Serialize;

use crate::columns::{self, output_columns};
use crate::error::{Result, TransformError};
use crate::facts::{
    self, FACILITIES_TABLE, MARKETS_TABLE, MOBILITY_TABLE, NUTRITION_TABLE, POPULATION_TABLE,
};
use crate::join::{CountyRow, FactTable, JoinKey, JoinStats, KeyValue, left_join};
use crate::resolve::CountryResolver;
use crate::rollup::national_record;

/// A clean table together with the file it came from.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub table: CleanTable,
    pub file: String,
}

impl SourceTable {
    pub fn new(table: CleanTable, file: impl Into<String>) -> Self {
        Self {
            table,
            file: file.into(),
        }
    }
}

/// Everything the build consumes. Only the base geography is mandatory.
#[derive(Debug, Clone)]
pub struct BuildInputs {
    pub base: SourceTable,
    pub population: Option<SourceTable>,
    pub nutrition: Option<SourceTable>,
    pub facilities: Option<SourceTable>,
    pub markets: Option<SourceTable>,
    pub mobility: Option<SourceTable>,
    /// Enriched demographic rows (with `iso3`).
    pub demographics: Option<SourceTable>,
    pub risk_context: Option<SourceTable>,
}

impl BuildInputs {
    pub fn from_base(base: SourceTable) -> Self {
        Self {
            base,
            population: None,
            nutrition: None,
            facilities: None,
            markets: None,
            mobility: None,
            demographics: None,
            risk_context: None,
        }
    }

    /// Files contributing to county rows, in integration order.
    pub fn county_source_files(&self) -> Vec<&str> {
        std::iter::once(&self.base)
            .chain(self.population.as_ref())
            .chain(self.nutrition.as_ref())
            .chain(self.facilities.as_ref())
            .chain(self.markets.as_ref())
            .chain(self.mobility.as_ref())
            .chain(self.risk_context.as_ref())
            .chain(self.demographics.as_ref())
            .map(|source| source.file.as_str())
            .collect()
    }
}

/// The unified output before materialization.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    pub columns: Vec<String>,
    /// County records in base order, followed by national records.
    pub records: Vec<UnifiedRecord>,
    pub joins: Vec<JoinStats>,
}

impl UnifiedTable {
    pub fn county_rows(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, UnifiedRecord::County { .. }))
            .count()
    }

    pub fn national_rows(&self) -> usize {
        self.records.len() - self.county_rows()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            county_rows: self.county_rows(),
            national_rows: self.national_rows(),
            columns: self.columns.len(),
            joins: self.joins.clone(),
        }
    }
}

/// Diagnostic counts of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    pub county_rows: usize,
    pub national_rows: usize,
    pub columns: usize,
    pub joins: Vec<JoinStats>,
}

const BASE_COLUMNS: [&str; 4] = ["state_name", "state_pcode", "county_name", "county_pcode"];

fn base_rows(base: &CleanTable) -> Result<Vec<CountyRow>> {
    if let Some(column) = BASE_COLUMNS.iter().find(|c| !base.has_column(c)) {
        return Err(TransformError::MissingColumn {
            table: base.source_id.clone(),
            column: (*column).to_string(),
        });
    }
    Ok(base
        .rows
        .iter()
        .map(|row| CountyRow {
            geography: hdx_model::GeographyKey::new(
                row.get("state_name"),
                row.get("state_pcode"),
                row.get("county_name"),
                row.get("county_pcode"),
            ),
            facts: FactRow::from([(
                columns::COUNTY_AREA.to_string(),
                Value::from_option(facts::parse_number(row.get(columns::COUNTY_AREA))),
            )]),
        })
        .collect())
}

type Builder = fn(&CleanTable) -> Result<FactTable>;

/// Build a county fact table, or an empty one when the source is absent.
fn county_table(
    name: &str,
    key: JoinKey,
    output: &[&str],
    source: Option<&SourceTable>,
    build: Builder,
) -> Result<FactTable> {
    match source {
        Some(source) => Ok(build(&source.table)?.with_source_file(source.file.clone())),
        None => {
            tracing::warn!(table = name, "source not found; columns will be null");
            Ok(FactTable::new(name, key, output))
        }
    }
}

/// Join every fact table onto the base geography and append national rows.
///
/// The county row count always equals the base row count; exactly one
/// national row is appended per tracked country.
pub fn build_unified(
    inputs: &BuildInputs,
    standards: &Standards,
    resolver: &CountryResolver,
) -> Result<UnifiedTable> {
    let _span = tracing::info_span!("build", base = %inputs.base.file).entered();
    let base_country = standards.tracked.base();
    let mut rows = base_rows(&inputs.base.table)?;
    let base_count = rows.len();

    let tables = [
        county_table(
            POPULATION_TABLE,
            JoinKey::CodePair,
            &columns::POPULATION_COLUMNS,
            inputs.population.as_ref(),
            facts::population_facts,
        )?,
        county_table(
            NUTRITION_TABLE,
            JoinKey::CodePair,
            &columns::NUTRITION_COLUMNS,
            inputs.nutrition.as_ref(),
            facts::nutrition_facts,
        )?,
        county_table(
            FACILITIES_TABLE,
            JoinKey::CountyCode,
            &columns::FACILITY_COLUMNS,
            inputs.facilities.as_ref(),
            facts::facility_facts,
        )?,
        county_table(
            MARKETS_TABLE,
            JoinKey::CountyName,
            &columns::MARKET_COLUMNS,
            inputs.markets.as_ref(),
            facts::market_facts,
        )?,
        county_table(
            MOBILITY_TABLE,
            JoinKey::CountyCode,
            &columns::MOBILITY_COLUMNS,
            inputs.mobility.as_ref(),
            facts::mobility_facts,
        )?,
    ];

    let demographics = match &inputs.demographics {
        Some(source) => facts::demographic_metrics(&source.table, &standards.series)?,
        None => {
            tracing::warn!("demographic source not found; metric columns will be null");
            Default::default()
        }
    };
    let risks = match &inputs.risk_context {
        Some(source) => facts::risk_contexts(&source.table, resolver)?,
        None => {
            tracing::warn!("risk context not found; context columns will be null");
            Default::default()
        }
    };
    let country = facts::country_facts(&standards.tracked, &risks, &demographics, &standards.series);

    let mut joins = Vec::with_capacity(tables.len() + 1);
    for table in tables.iter().chain(std::iter::once(&country)) {
        joins.push(left_join(&mut rows, base_country.alpha3, table));
    }

    let provenance = inputs.county_source_files().join("; ");
    let mut records: Vec<UnifiedRecord> = rows
        .into_iter()
        .map(|row| {
            let mut facts = row.facts;
            facts.insert(columns::DATA_SOURCES.to_string(), Value::text(provenance.clone()));
            UnifiedRecord::County {
                geography: row.geography,
                country: base_country.identity(),
                facts,
            }
        })
        .collect();
    debug_assert_eq!(records.len(), base_count);

    let mut nationals = Vec::with_capacity(standards.tracked.len());
    for tracked in standards.tracked.iter() {
        let counties: Vec<&UnifiedRecord> = records
            .iter()
            .filter(|r| r.country().iso3 == tracked.alpha3)
            .collect();
        let context = country
            .get(&KeyValue::Country(tracked.alpha3))
            .cloned()
            .unwrap_or_default();
        nationals.push(national_record(tracked, &counties, &context));
    }
    records.extend(nationals);

    let table = UnifiedTable {
        columns: output_columns(&standards.series),
        records,
        joins,
    };
    tracing::info!(
        county_rows = table.county_rows(),
        national_rows = table.national_rows(),
        "assembled unified table"
    );
    Ok(table)
}
