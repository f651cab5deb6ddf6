//! Demographic enrichment with resolved country codes.

use hdx_model::{CleanRecord, CleanTable, country_code_field};

use crate::resolve::{CountryResolver, ResolutionStats};

/// Columns of the enriched demographic table, in output order.
pub const ENRICHED_COLUMNS: [&str; 8] = [
    "iso3",
    "m49_code",
    "region_country_area",
    "year",
    "series",
    "value",
    "footnotes",
    "source",
];

/// Identity of the enriched table.
pub const ENRICHED_SOURCE_ID: &str = "demographic_enriched";

#[derive(Debug, Clone)]
pub struct Enriched {
    pub table: CleanTable,
    pub stats: ResolutionStats,
}

/// Prefix each demographic row with its resolved `iso3`.
///
/// In strict mode rows without a code are left out; otherwise they are
/// kept with an empty `iso3`. Either way they are tallied in the stats.
pub fn enrich_demographics(input: &CleanTable, resolver: &CountryResolver, strict: bool) -> Enriched {
    let _span = tracing::info_span!("enrich", source = %input.source_id, strict).entered();
    let mut stats = ResolutionStats::default();
    let mut table = CleanTable::new(
        ENRICHED_SOURCE_ID,
        ENRICHED_COLUMNS.iter().map(ToString::to_string).collect(),
    );
    table.encoding = input.encoding.clone();

    for row in &input.rows {
        let raw_name = row.get("region_country_area").trim();
        let resolution = resolver.resolve(row.get("m49_code"), raw_name);
        stats.record(raw_name, resolution);
        let code = resolution.code();
        if code.is_none() {
            tracing::trace!(name = raw_name, "unresolved country name");
            if strict {
                continue;
            }
        }

        let mut record = CleanRecord::new();
        record.insert("iso3", country_code_field(code));
        for column in &ENRICHED_COLUMNS[1..] {
            record.insert(*column, row.get(column).trim());
        }
        table.rows.push(record);
    }

    table.stats.total = stats.total;
    table.stats.kept = table.rows.len();
    tracing::info!(
        total = stats.total,
        mapped = stats.mapped,
        kept = table.rows.len(),
        unmapped_names = stats.unmapped.len(),
        "enriched demographic rows"
    );
    Enriched { table, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdx_model::CountryCode;
    use hdx_standards::{AliasTable, CountryEntry, CountryRegistry};

    fn resolver() -> CountryResolver {
        let registry = CountryRegistry::from_entries(vec![CountryEntry {
            alpha2: "SD".into(),
            alpha3: CountryCode::parse("SDN").unwrap(),
            numeric: "729".into(),
            name: "Sudan".into(),
            official_name: None,
            common_name: None,
        }]);
        CountryResolver::new(&registry, &AliasTable::default())
    }

    fn input() -> CleanTable {
        let mut table = CleanTable::new("demographic", vec![]);
        table.rows.push(CleanRecord::from_iter([
            ("m49_code", "729"),
            ("region_country_area", "Sudan"),
            ("year", "2023"),
            ("series", "Total fertility rate (children per women)"),
            ("value", "4.3"),
        ]));
        table.rows.push(CleanRecord::from_iter([
            ("m49_code", ""),
            ("region_country_area", "Sub-Saharan Africa"),
            ("year", "2023"),
        ]));
        table
    }

    #[test]
    fn strict_mode_drops_unresolved_rows() {
        let enriched = enrich_demographics(&input(), &resolver(), true);
        assert_eq!(enriched.table.len(), 1);
        assert_eq!(enriched.table.headers[0], "iso3");
        assert_eq!(enriched.table.rows[0].get("iso3"), "SDN");
        assert_eq!(enriched.table.rows[0].get("footnotes"), "");
        assert_eq!(enriched.stats.total, 2);
        assert_eq!(enriched.stats.unmapped.get("Sub-Saharan Africa"), Some(&1));
    }

    #[test]
    fn lenient_mode_keeps_rows_with_empty_code() {
        let enriched = enrich_demographics(&input(), &resolver(), false);
        assert_eq!(enriched.table.len(), 2);
        assert_eq!(enriched.table.rows[1].get("iso3"), "");
    }
}
