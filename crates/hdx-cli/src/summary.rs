use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hdx_model::SourceDescriptor;
use hdx_standards::SourceCatalog;
use hdx_transform::ResolutionStats;

use crate::types::{BuildResult, CleanResult, EnrichResult, RunResult};

/// Number of unmapped names listed after enrichment.
pub const TOP_UNMAPPED: usize = 20;

pub fn print_clean_summary(result: &CleanResult) {
    println!("Clean copies: {}", result.output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Source"),
        header_cell("Encoding"),
        header_cell("Rows"),
        header_cell("Metadata"),
        header_cell("Empty"),
        header_cell("Kept"),
        header_cell("Malformed"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let mut kept = 0usize;
    for source in &result.sources {
        let stats = &source.stats;
        kept += stats.kept;
        table.add_row(vec![
            Cell::new(&source.file),
            Cell::new(&source.source_id),
            dim_cell(source.encoding.as_deref().unwrap_or("-")),
            Cell::new(stats.total),
            count_cell(stats.dropped_metadata, Color::Yellow),
            count_cell(stats.dropped_empty, Color::Yellow),
            Cell::new(stats.kept),
            count_cell(stats.malformed_numeric, Color::Red),
        ]);
    }
    table.add_row(vec![
        total_cell("TOTAL"),
        total_cell(format!("{} sources", result.sources.len())),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(kept).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_enrich_summary(result: &EnrichResult) {
    println!("Enriched: {}", result.output.display());
    print_resolution(&result.stats);
    if !result.strict {
        println!("Unresolved rows kept with an empty iso3.");
    }
}

pub fn print_build_summary(result: &BuildResult) {
    println!("Output: {}", result.output.path.display());
    if let Some(stats) = &result.resolution {
        println!("Demographics enriched in memory:");
        print_resolution(stats);
    }
    let summary = &result.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Key"),
        header_cell("Matched"),
        header_cell("Missed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for join in &summary.joins {
        table.add_row(vec![
            Cell::new(&join.table),
            dim_cell(join.key.as_str()),
            count_cell(join.matched, Color::Green),
            count_cell(join.missed, Color::Yellow),
        ]);
    }
    println!("{table}");
    println!(
        "Rows: {} county, {} national ({} columns)",
        summary.county_rows, summary.national_rows, summary.columns
    );
    println!("SHA-256: {}", result.output.sha256);
}

pub fn print_run_summary(result: &RunResult) {
    print_clean_summary(&result.clean);
    if let Some(enrich) = &result.enrich {
        print_enrich_summary(enrich);
    }
    print_build_summary(&result.build);
}

pub fn print_sources(catalog: &SourceCatalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Pattern"),
        header_cell("Kind"),
        header_cell("Header row"),
        header_cell("Numeric"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for descriptor in catalog.iter() {
        table.add_row(source_row(descriptor));
    }
    println!("{table}");
}

/// Display fields of one catalog entry.
pub fn source_row(descriptor: &SourceDescriptor) -> Vec<String> {
    let kind = match &descriptor.sheet {
        Some(sheet) => format!("{} ({sheet})", descriptor.kind.as_str()),
        None => descriptor.kind.as_str().to_string(),
    };
    vec![
        descriptor.id.clone(),
        descriptor.pattern.clone(),
        kind,
        descriptor.header_row.to_string(),
        descriptor.numeric.len().to_string(),
    ]
}

fn print_resolution(stats: &ResolutionStats) {
    println!("{}", mapped_line(stats));
    let top = stats.top_unmapped(TOP_UNMAPPED);
    if top.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Unmapped name"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in top {
        table.add_row(vec![Cell::new(name), count_cell(count, Color::Yellow)]);
    }
    println!("{table}");
}

/// `Mapped: mapped/total (pct%)`.
pub fn mapped_line(stats: &ResolutionStats) -> String {
    format!(
        "Mapped: {}/{} ({:.1}%)",
        stats.mapped,
        stats.total,
        stats.mapped_pct()
    )
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
