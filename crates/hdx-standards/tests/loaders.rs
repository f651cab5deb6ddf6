use hdx_model::{CountryCode, SourceKind};
use hdx_standards::Standards;

fn code(raw: &str) -> CountryCode {
    CountryCode::parse(raw).expect("valid code")
}

#[test]
fn loads_bundled_standards() {
    let standards = Standards::load_default().expect("load standards");
    assert!(standards.countries.len() >= 249);
    assert_eq!(standards.aliases.len(), 18);
    assert_eq!(standards.series.len(), 7);
    assert_eq!(standards.tracked.base().alpha3, code("SSD"));
}

#[test]
fn registry_covers_resolution_anchors() {
    let standards = Standards::load_default().expect("load standards");
    let sudan = standards.countries.by_numeric("729").expect("729 present");
    assert_eq!(sudan.alpha3, code("SDN"));
    let names = standards.countries.name_index();
    assert_eq!(names.get("south sudan"), Some(&code("SSD")));
    // The registry spells this one differently; the alias table fills the gap.
    assert!(!names.contains_key("congo democratic republic of the"));
    assert_eq!(
        standards.aliases.get("congo democratic republic of the"),
        Some(code("COD"))
    );
}

#[test]
fn catalog_declares_workbook_sources() {
    let standards = Standards::load_default().expect("load standards");
    let base = standards
        .catalog
        .find("ssd_adminboundaries_tabulardata.xlsx")
        .expect("base descriptor");
    assert_eq!(base.kind, SourceKind::Workbook);
    assert_eq!(base.sheet.as_deref(), Some("ADM2"));
    assert_eq!(base.rename.get("ADM2_PCODE").map(String::as_str), Some("county_pcode"));

    let demographic = standards.catalog.descriptor_for("demographic_data.csv");
    assert_eq!(demographic.id, "demographic");
    assert_eq!(demographic.header_row, 1);
    let enriched = standards.catalog.descriptor_for("demographic_data_iso.csv");
    assert_eq!(enriched.id, "demographic_enriched");
}

#[test]
fn source_ids_snapshot() {
    let standards = Standards::load_default().expect("load standards");
    let ids: Vec<&str> = standards.catalog.iter().map(|s| s.id.as_str()).collect();
    insta::assert_snapshot!(ids.join("\n"), @r"
    admin_boundaries
    population
    nutrition
    facilities
    markets
    mobility
    demographic
    demographic_enriched
    risk_context
    fts_funding
    flood_events
    needs_overview
    response_plans
    population_admin0
    admin_boundaries_metadata
    ");
}

#[test]
fn tracked_reference_figures() {
    let standards = Standards::load_default().expect("load standards");
    let sudan = standards.tracked.get(code("SDN")).expect("SDN tracked");
    assert!(!sudan.base);
    assert_eq!(sudan.reference("male_total_n"), Some(20_857_303.0));
    assert_eq!(sudan.reference("population_total"), Some(41_138_904.0));
    assert_eq!(sudan.identity().iso2, "SD");
}
