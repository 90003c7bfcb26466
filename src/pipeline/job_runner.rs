// ジョブ単位: manifest -> 生画像抽出 -> 分類 -> マスク合成

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::ensure_manifest;
use crate::error::PietroError;
use crate::layout::{DocumentLayout, SourcePdf};
use crate::pipeline::classifier::classify;
use crate::pipeline::compositor::{
    CompositionOptions, ExtractedIllustration, extract_illustrations,
};
use crate::pipeline::raw_extraction::{RawExtraction, ensure_raw_images};
use crate::runner::ProcessRunner;

/// Configuration for a single job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub input_path: PathBuf,
    pub output_root: PathBuf,
    pub composition: CompositionOptions,
}

/// Result of extracting the illustrations of one PDF.
#[derive(Debug)]
pub struct ExtractionReport {
    pub input_path: PathBuf,
    pub document: String,
    pub illustrations_dir: PathBuf,
    pub manifest_entries: usize,
    pub raw: RawExtraction,
    pub illustrations: Vec<ExtractedIllustration>,
    /// Per-illustration failures collected in best-effort mode.
    pub failures: Vec<PietroError>,
}

/// Extract the illustrations of `input_file` under `output_root`.
///
/// Stage 1: manifest (cached in `raw/<doc>/manifest.json`)
/// Stage 2: raw dump (skipped when the raw file count matches the manifest)
/// Stage 3: classification
/// Stage 4: mask composition or copy, one illustration at a time by default
///
/// When stage 2 was a no-op, illustrations already on disk are kept as they are.
/// Errors from stages 1 and 2 are wrapped in [`PietroError::Document`].
pub fn extract_images(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    output_root: &Path,
    options: &CompositionOptions,
) -> crate::error::Result<ExtractionReport> {
    let source = SourcePdf::locate(input_file)?;
    let layout = DocumentLayout::new(&source.path, output_root)?;

    let tag = |e: PietroError| PietroError::Document {
        document: layout.document().to_string(),
        path: source.path.clone(),
        source: Box::new(e),
    };
    let manifest = ensure_manifest(runner, &source.path, output_root).map_err(tag)?;
    let raw = ensure_raw_images(runner, &source.path, output_root).map_err(tag)?;
    let illustrations = classify(&manifest);

    let options = CompositionOptions {
        skip_existing: options.skip_existing || raw == RawExtraction::UpToDate,
        ..options.clone()
    };
    let report = extract_illustrations(runner, &layout, &manifest, &illustrations, &options)?;

    info!(
        document = layout.document(),
        images = manifest.len(),
        illustrations = illustrations.len(),
        "extraction finished"
    );

    Ok(ExtractionReport {
        input_path: source.path,
        document: layout.document().to_string(),
        illustrations_dir: layout.illustrations_dir().to_path_buf(),
        manifest_entries: manifest.len(),
        raw,
        illustrations: report.illustrations,
        failures: report.failures,
    })
}

/// Run a single job.
pub fn run_job(
    runner: &dyn ProcessRunner,
    config: &JobConfig,
) -> crate::error::Result<ExtractionReport> {
    extract_images(
        runner,
        &config.input_path,
        &config.output_root,
        &config.composition,
    )
}
