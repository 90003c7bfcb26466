// イラスト出力: soft mask があれば magick で合成+trim、無ければそのままコピー

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::PietroError;
use crate::layout::{DocumentLayout, file_name_of};
use crate::manifest::{ImageType, ManifestEntry};
use crate::pipeline::classifier::Illustration;
use crate::pipeline::raw_extraction::find_raw_image;
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// What to do when one illustration fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing illustration.
    #[default]
    FailFast,
    /// Keep going and report every failure.
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct CompositionOptions {
    /// Illustrations processed at once. `magick` shares one sandbox, so keep 1
    /// unless the runner is known to be reentrant.
    pub concurrency: usize,
    pub policy: FailurePolicy,
    /// Leave illustrations whose output file already exists untouched.
    pub skip_existing: bool,
}

impl Default for CompositionOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            policy: FailurePolicy::FailFast,
            skip_existing: false,
        }
    }
}

/// How an illustration file was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllustrationSource {
    /// Raw image copied as-is (no soft mask).
    Copied,
    /// Raw image composited with its soft mask, then trimmed.
    Composited,
    /// Output already present from a previous run.
    Existing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedIllustration {
    pub output_index: usize,
    pub path: PathBuf,
    pub source: IllustrationSource,
}

#[derive(Debug, Default)]
pub struct IllustrationReport {
    pub illustrations: Vec<ExtractedIllustration>,
    /// Only populated under [`FailurePolicy::BestEffort`].
    pub failures: Vec<PietroError>,
}

/// The soft mask paired with `entry`: the single gray `smask` sharing its object ID.
///
/// Zero or several candidates both mean "no mask"; the pairing is never guessed.
pub fn find_mask<'a>(
    manifest: &'a [ManifestEntry],
    entry: &ManifestEntry,
) -> Option<&'a ManifestEntry> {
    let mut candidates = manifest.iter().filter(|candidate| {
        candidate.object_id == entry.object_id
            && candidate.image_type == ImageType::Smask
            && candidate.color == "gray"
    });
    let mask = candidates.next()?;
    if candidates.next().is_some() {
        warn!(
            object_id = entry.object_id,
            image_index = entry.image_index,
            "several soft masks share this object ID, treating as unmasked"
        );
        return None;
    }
    Some(mask)
}

/// Produce `illustrations/<doc>/<output_index>.png` for one illustration.
///
/// The file is built as `<output_index>.tmp.png` and only renamed to its final
/// name once every step succeeded, so a final name on disk is always complete.
pub fn extract_illustration(
    runner: &dyn ProcessRunner,
    layout: &DocumentLayout,
    manifest: &[ManifestEntry],
    illustration: &Illustration,
) -> crate::error::Result<ExtractedIllustration> {
    let output_path = layout.illustration_path(illustration.output_index);
    let work_path = layout.illustration_work_path(illustration.output_index);
    let image = &illustration.entry;

    let built = match find_mask(manifest, image) {
        Some(mask) => compose_with_mask(runner, layout.raw_dir(), image, mask, &work_path)
            .map(|()| IllustrationSource::Composited),
        None => copy_raw_image(layout, image, &work_path).map(|()| IllustrationSource::Copied),
    };
    let source = match built {
        Ok(source) => source,
        Err(e) => {
            discard_work_file(&work_path);
            return Err(e);
        }
    };
    fs::rename(&work_path, &output_path)?;

    debug!(
        document = layout.document(),
        output_index = illustration.output_index,
        ?source,
        "illustration written"
    );
    Ok(ExtractedIllustration {
        output_index: illustration.output_index,
        path: output_path,
        source,
    })
}

fn copy_raw_image(
    layout: &DocumentLayout,
    image: &ManifestEntry,
    work_path: &Path,
) -> crate::error::Result<()> {
    let raw_path = find_raw_image(layout.raw_dir(), image.image_index)?;
    fs::create_dir_all(layout.illustrations_dir())?;
    fs::copy(&raw_path, work_path)?;
    Ok(())
}

// 失敗した作業ファイルの削除失敗は元のエラーより優先しない
fn discard_work_file(work_path: &Path) {
    if work_path.exists()
        && let Err(e) = fs::remove_file(work_path)
    {
        warn!(path = %work_path.display(), error = %e, "failed to remove work file");
    }
}

/// Apply `mask` as the opacity channel of `image`, then trim the padding.
///
/// 合成ツールは入力ディレクトリを1つしかマウントできないため、
/// 画像とマスクが別ディレクトリにある場合は何も実行せずにエラーを返す。
pub fn compose_with_mask(
    runner: &dyn ProcessRunner,
    raw_dir: &Path,
    image: &ManifestEntry,
    mask: &ManifestEntry,
    output_path: &Path,
) -> crate::error::Result<()> {
    let image_path = find_raw_image(raw_dir, image.image_index)?;
    let mask_path = find_raw_image(raw_dir, mask.image_index)?;

    if image_path.parent() != mask_path.parent() {
        return Err(PietroError::MaskImageDirectoryMismatch {
            image: image_path,
            mask: mask_path,
        });
    }
    let input_directory = image_path
        .parent()
        .ok_or_else(|| PietroError::config(format!("{} has no parent", image_path.display())))?;
    let output_directory = output_path.parent().ok_or_else(|| {
        PietroError::config(format!("{} has no parent", output_path.display()))
    })?;
    fs::create_dir_all(output_directory)?;

    let image_name = file_name_of(&image_path)?;
    let mask_name = file_name_of(&mask_path)?;
    let output_name = file_name_of(output_path)?;

    // Masks are not guaranteed to share the image's resolution
    let compose = ToolCommand::new("magick")
        .arg("composite")
        .args(["-compose", "CopyOpacity"])
        .arg("-resize")
        .arg(format!("{}x{}", image.width, image.height))
        .arg(guest_input(&mask_name))
        .arg(guest_input(&image_name))
        .arg(format!("PNG32:{}", guest_output(&output_name)));
    runner.run(
        &compose,
        &RunOptions::input_output(input_directory, output_directory),
    )?;

    let trim = ToolCommand::new("magick")
        .arg(guest_input(&output_name))
        .arg("-trim")
        .arg(format!("PNG32:{}", guest_input(&output_name)));
    runner.run(&trim, &RunOptions::input(output_directory))?;

    Ok(())
}

/// Write every classified illustration of one document.
///
/// Output indices come from classification, so a failed illustration never
/// shifts the others.
pub fn extract_illustrations(
    runner: &dyn ProcessRunner,
    layout: &DocumentLayout,
    manifest: &[ManifestEntry],
    illustrations: &[Illustration],
    options: &CompositionOptions,
) -> crate::error::Result<IllustrationReport> {
    let process = |illustration: &Illustration| {
        let output_path = layout.illustration_path(illustration.output_index);
        if options.skip_existing && output_path.is_file() {
            return Ok(ExtractedIllustration {
                output_index: illustration.output_index,
                path: output_path,
                source: IllustrationSource::Existing,
            });
        }
        extract_illustration(runner, layout, manifest, illustration).map_err(|e| {
            PietroError::Illustration {
                document: layout.document().to_string(),
                output_index: illustration.output_index,
                source: Box::new(e),
            }
        })
    };

    let mut report = IllustrationReport::default();

    if options.concurrency <= 1 {
        for illustration in illustrations {
            match process(illustration) {
                Ok(done) => report.illustrations.push(done),
                Err(e) => record_failure(&mut report, e, options.policy)?,
            }
        }
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.concurrency)
            .build()
            .map_err(|e| PietroError::config(format!("failed to build thread pool: {e}")))?;
        let results: Vec<crate::error::Result<ExtractedIllustration>> =
            pool.install(|| illustrations.par_iter().map(process).collect());
        for result in results {
            match result {
                Ok(done) => report.illustrations.push(done),
                Err(e) => record_failure(&mut report, e, options.policy)?,
            }
        }
    }

    info!(
        document = layout.document(),
        written = report.illustrations.len(),
        failed = report.failures.len(),
        "illustrations extracted"
    );
    Ok(report)
}

fn record_failure(
    report: &mut IllustrationReport,
    error: PietroError,
    policy: FailurePolicy,
) -> crate::error::Result<()> {
    match policy {
        FailurePolicy::FailFast => Err(error),
        FailurePolicy::BestEffort => {
            warn!(%error, "illustration failed, continuing");
            report.failures.push(error);
            Ok(())
        }
    }
}
