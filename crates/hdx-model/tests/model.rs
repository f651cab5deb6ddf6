//! Tests for hdx-model types.

use hdx_model::{
    CountryCode, CountryIdentity, FactRow, GeographyKey, RecordLevel, SourceDescriptor,
    SourceKind, UnifiedRecord, Value,
};
use proptest::prelude::*;

#[test]
fn descriptor_deserializes_with_defaults() {
    let descriptor: SourceDescriptor = toml::from_str(
        r#"
id = "demographic_data"
pattern = "demographic_data.csv"
header_row = 1
columns = ["m49_code", "region_country_area", "year", "series", "value", "footnotes", "source"]
numeric = ["year", "value"]
"#,
    )
    .expect("parse descriptor");
    assert_eq!(descriptor.kind, SourceKind::Delimited);
    assert_eq!(descriptor.header_row, 1);
    assert_eq!(descriptor.encodings, vec!["utf-8", "windows-1252"]);
    assert_eq!(descriptor.filter.comment_marker, "#");
    assert!((descriptor.filter.metadata_threshold - 0.5).abs() < f64::EPSILON);
    assert!(descriptor.is_numeric("value"));
    assert!(descriptor.validate().is_ok());
}

#[test]
fn descriptor_reads_row_filter_overrides() {
    let descriptor: SourceDescriptor = toml::from_str(
        r#"
id = "facilities"
pattern = "who-master-facility-list*.xlsx"
kind = "workbook"
sheet = "hsf_master_facility_list_202403"
comment_marker = "//"
metadata_threshold = 0.75
"#,
    )
    .expect("parse descriptor");
    assert_eq!(descriptor.kind, SourceKind::Workbook);
    assert_eq!(descriptor.filter.comment_marker, "//");
    assert!((descriptor.filter.metadata_threshold - 0.75).abs() < f64::EPSILON);
}

#[test]
fn unified_record_serializes_with_level_tag() {
    let mut facts = FactRow::new();
    facts.insert("hunger_status".into(), Value::text("red"));
    let record = UnifiedRecord::County {
        geography: GeographyKey::new("Unity", "SS06", "Rubkona", "SS0608"),
        country: CountryIdentity {
            iso3: CountryCode::parse("SSD").unwrap(),
            iso2: "SS".into(),
            name: "South Sudan".into(),
        },
        facts,
    };
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["record_level"], "county");
    assert_eq!(json["country"]["iso3"], "SSD");
    assert_eq!(record.level(), RecordLevel::County);
}

proptest! {
    #[test]
    fn parsed_country_codes_are_three_uppercase_letters(raw in "\\PC{0,6}") {
        if let Some(code) = CountryCode::parse(&raw) {
            let text = code.as_str();
            prop_assert_eq!(text.len(), 3);
            prop_assert!(text.bytes().all(|b| b.is_ascii_uppercase()));
        }
    }

    #[test]
    fn uppercase_triples_always_parse(raw in "[A-Z]{3}") {
        prop_assert_eq!(CountryCode::parse(&raw).map(|c| c.to_string()), Some(raw));
    }
}
