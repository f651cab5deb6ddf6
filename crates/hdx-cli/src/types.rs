use std::path::PathBuf;

use hdx_model::SourceStats;
use hdx_transform::{BuildSummary, OutputSummary, ResolutionStats};
use serde::Serialize;

/// One canonicalized source written by `clean`.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedSource {
    pub file: String,
    pub source_id: String,
    pub encoding: Option<String>,
    pub stats: SourceStats,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct CleanResult {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// In file-name order.
    pub sources: Vec<CleanedSource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_written: usize,
    pub strict: bool,
    pub stats: ResolutionStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub data_dir: PathBuf,
    pub output: OutputSummary,
    pub summary: BuildSummary,
    /// Present when demographics were enriched in memory.
    pub resolution: Option<ResolutionStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub clean: CleanResult,
    pub enrich: Option<EnrichResult>,
    pub build: BuildResult,
}
