use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, info_span};

use hdx_ingest::{
    canonicalize_file, file_name, list_csv_files, locate_source, write_clean_table,
    write_clean_tables,
};
use hdx_model::CleanTable;
use hdx_standards::Standards;
use hdx_transform::inputs::DEMOGRAPHIC_SOURCE_ID;
use hdx_transform::{
    CountryResolver, DEFAULT_OUTPUT_NAME, build_unified, clean_dir, enrich_demographics,
    load_inputs, read_source, write_unified,
};

use crate::cli::{BuildArgs, CleanArgs, EnrichArgs};
use crate::types::{BuildResult, CleanResult, CleanedSource, EnrichResult, RunResult};

/// Default file name of the enriched demographic table.
pub const ENRICHED_FILE_NAME: &str = "demographic_data_iso.csv";

/// Load standards from `dir`, or the default location.
pub fn load_standards(dir: Option<&Path>) -> Result<Standards> {
    match dir {
        Some(dir) => Standards::load(dir)
            .with_context(|| format!("load standards from {}", dir.display())),
        None => Standards::load_default().context("load standards"),
    }
}

/// Canonicalize every `*.csv` directly under the data directory.
///
/// The default unified output is not a source and is skipped.
pub fn run_clean(args: &CleanArgs, standards: &Standards) -> Result<CleanResult> {
    let exclude = [args.data_dir.join(DEFAULT_OUTPUT_NAME)];
    clean_sources(args, &exclude, standards)
}

fn clean_sources(
    args: &CleanArgs,
    exclude: &[PathBuf],
    standards: &Standards,
) -> Result<CleanResult> {
    let data_dir = &args.data_dir;
    let _span = info_span!("clean", data_dir = %data_dir.display()).entered();
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| clean_dir(data_dir));
    let files: Vec<PathBuf> = list_csv_files(data_dir)
        .with_context(|| format!("list sources in {}", data_dir.display()))?
        .into_iter()
        .filter(|path| {
            let skip = exclude.iter().any(|excluded| same_file(path, excluded));
            if skip {
                debug!(file = file_name(path), "skipping pipeline output");
            }
            !skip
        })
        .collect();

    // Every source is canonicalized before anything is written; indexed
    // collect keeps file-name order.
    let tables = files
        .par_iter()
        .map(|path| canonicalize_one(path, standards))
        .collect::<Result<Vec<_>>>()?;

    let named: Vec<(&str, &CleanTable)> = files
        .iter()
        .zip(&tables)
        .map(|(path, (_, table))| (file_name(path), table))
        .collect();
    let written = write_clean_tables(&output_dir, &named)
        .with_context(|| format!("write clean copies to {}", output_dir.display()))?;

    let sources: Vec<CleanedSource> = files
        .iter()
        .zip(tables)
        .zip(written)
        .map(|((path, (source_id, table)), output)| CleanedSource {
            file: file_name(path).to_string(),
            source_id,
            encoding: table.encoding.clone(),
            stats: table.stats,
            output,
        })
        .collect();
    info!(
        sources = sources.len(),
        output_dir = %output_dir.display(),
        "cleaned sources"
    );
    Ok(CleanResult {
        data_dir: data_dir.clone(),
        output_dir,
        sources,
    })
}

fn canonicalize_one(path: &Path, standards: &Standards) -> Result<(String, CleanTable)> {
    let _span = info_span!("source", file = file_name(path)).entered();
    let descriptor = standards.catalog.descriptor_for(file_name(path));
    let table = canonicalize_file(path, &descriptor)
        .with_context(|| format!("canonicalize {}", path.display()))?;
    Ok((descriptor.id, table))
}

/// Whether two paths name the same file, comparing canonical forms when both exist.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Resolve country codes for the demographic source and write the enriched table.
pub fn run_enrich(args: &EnrichArgs, standards: &Standards) -> Result<EnrichResult> {
    let input = &args.input;
    let _span = info_span!("enrich", input = %input.display()).entered();
    let descriptor = standards
        .catalog
        .get(DEMOGRAPHIC_SOURCE_ID)
        .with_context(|| format!("source '{DEMOGRAPHIC_SOURCE_ID}' is not declared"))?;
    let source = read_source(input, descriptor)
        .with_context(|| format!("read demographic source {}", input.display()))?;

    let resolver = CountryResolver::new(&standards.countries, &standards.aliases);
    let strict = !args.keep_unresolved;
    let enriched = enrich_demographics(&source.table, &resolver, strict);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| input.with_file_name(ENRICHED_FILE_NAME));
    write_clean_table(&output, &enriched.table)
        .with_context(|| format!("write enriched table {}", output.display()))?;
    info!(
        mapped = enriched.stats.mapped,
        total = enriched.stats.total,
        output = %output.display(),
        "enriched demographic source"
    );
    Ok(EnrichResult {
        input: input.clone(),
        output,
        rows_written: enriched.table.len(),
        strict,
        stats: enriched.stats,
    })
}

/// Join every located source into the unified output.
pub fn run_build(args: &BuildArgs, standards: &Standards) -> Result<BuildResult> {
    let data_dir = &args.data_dir;
    let _span = info_span!("build", data_dir = %data_dir.display()).entered();
    let resolver = CountryResolver::new(&standards.countries, &standards.aliases);
    let loaded = load_inputs(data_dir, standards, &resolver, args.risk_context.as_deref())
        .context("load build inputs")?;
    let table =
        build_unified(&loaded.inputs, standards, &resolver).context("build unified table")?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| data_dir.join(DEFAULT_OUTPUT_NAME));
    let output = write_unified(&output_path, &table)
        .with_context(|| format!("write {}", output_path.display()))?;
    Ok(BuildResult {
        data_dir: data_dir.clone(),
        output,
        summary: table.summary(),
        resolution: loaded.resolution,
    })
}

/// `clean`, then `enrich` when a demographic source exists, then `build`.
pub fn run_pipeline(args: &BuildArgs, standards: &Standards) -> Result<RunResult> {
    let mut exclude = vec![args.data_dir.join(DEFAULT_OUTPUT_NAME)];
    exclude.extend(args.output.clone());
    let clean = clean_sources(
        &CleanArgs {
            data_dir: args.data_dir.clone(),
            output_dir: None,
        },
        &exclude,
        standards,
    )?;

    let enrich = match demographic_clean_copy(&clean.output_dir, standards)? {
        Some(input) => {
            let output = clean.output_dir.join(ENRICHED_FILE_NAME);
            Some(run_enrich(
                &EnrichArgs {
                    input,
                    output: Some(output),
                    keep_unresolved: false,
                },
                standards,
            )?)
        }
        None => {
            info!("no demographic source; skipping enrichment");
            None
        }
    };

    let build = run_build(args, standards)?;
    Ok(RunResult {
        clean,
        enrich,
        build,
    })
}

fn demographic_clean_copy(clean_dir: &Path, standards: &Standards) -> Result<Option<PathBuf>> {
    let Some(descriptor) = standards.catalog.get(DEMOGRAPHIC_SOURCE_ID) else {
        return Ok(None);
    };
    locate_source(&[clean_dir], descriptor).context("locate demographic source")
}

/// Write `summary` as pretty JSON.
pub fn write_summary_json<T: Serialize>(path: &Path, summary: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serialize run summary")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("write summary {}", path.display()))?;
    Ok(())
}
