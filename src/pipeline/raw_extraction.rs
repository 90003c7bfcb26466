// 生画像抽出: pdfimages -png で全画像をダンプし、強制される接頭辞を取り除く

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cache::ManifestStore;
use crate::error::PietroError;
use crate::layout::{DocumentLayout, SourcePdf};
use crate::manifest::ManifestEntry;
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// `pdfimages` always writes `<root>-NNN.png`; this is the root we hand it.
pub const DUMP_PREFIX: &str = "PREFIX_TO_REMOVE";

/// Outcome of [`ensure_raw_images`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawExtraction {
    /// The raw directory already holds one file per manifest entry.
    UpToDate,
    /// `pdfimages` ran; these are the renamed files.
    Extracted { files: Vec<PathBuf> },
}

/// Make sure every image listed in the manifest has been dumped to the raw directory.
///
/// Files still carrying [`DUMP_PREFIX`] belong to an interrupted run and are
/// not counted. When the dump is already complete (see [`is_dump_complete`])
/// nothing is run.
pub fn ensure_raw_images(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    base_dir: &Path,
) -> crate::error::Result<RawExtraction> {
    let source = SourcePdf::locate(input_file)?;
    let layout = DocumentLayout::new(input_file, base_dir)?;
    let raw_dir = layout.raw_dir();

    let manifest = ManifestStore::for_layout(&layout).load()?;
    let existing = finished_raw_files(raw_dir)?;
    if is_dump_complete(&manifest, &existing) {
        debug!(
            document = layout.document(),
            files = existing.len(),
            "raw images up to date"
        );
        return Ok(RawExtraction::UpToDate);
    }

    fs::create_dir_all(raw_dir)?;
    let command = ToolCommand::new("pdfimages")
        .arg("-png")
        .arg(guest_input(&source.file_name))
        .arg(guest_output(DUMP_PREFIX));
    runner.run(
        &command,
        &RunOptions::input_output(&source.directory, raw_dir),
    )?;

    let files = strip_dump_prefix(raw_dir)?;
    info!(
        document = layout.document(),
        expected = manifest.len(),
        extracted = files.len(),
        "raw images extracted"
    );
    Ok(RawExtraction::Extracted { files })
}

/// Whether `finished` raw files cover the whole manifest.
///
/// Either the count matches, or there are more files than entries and every
/// entry's image index has its file. The second case covers rows the parser
/// dropped as malformed: `pdfimages -png` still dumps those images.
pub fn is_dump_complete(manifest: &[ManifestEntry], finished: &[PathBuf]) -> bool {
    if finished.len() == manifest.len() {
        return true;
    }
    if finished.len() < manifest.len() {
        return false;
    }
    let dumped: HashSet<u32> = finished.iter().filter_map(|p| raw_index(p)).collect();
    manifest.iter().all(|entry| dumped.contains(&entry.image_index))
}

/// `*.png` directly under `raw_dir`, excluding files that still carry the dump prefix.
pub fn finished_raw_files(raw_dir: &Path) -> crate::error::Result<Vec<PathBuf>> {
    if !raw_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(raw_dir)? {
        let path = entry?.path();
        if is_png(&path) && !has_dump_prefix(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `PREFIX_TO_REMOVE-012.png` → `012.png`.
///
/// 既に同名のファイルがある場合は上書きせず、新しくダンプされた方を削除する。
fn strip_dump_prefix(raw_dir: &Path) -> crate::error::Result<Vec<PathBuf>> {
    let dumped_prefix = format!("{DUMP_PREFIX}-");
    let mut renamed = Vec::new();

    for entry in fs::read_dir(raw_dir)? {
        let path = entry?.path();
        if !is_png(&path) {
            continue;
        }
        let Some(suffix) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_prefix(&dumped_prefix))
        else {
            continue;
        };

        let target = raw_dir.join(suffix);
        if target.exists() {
            debug!(
                existing = %target.display(),
                "keeping existing raw image, discarding fresh dump"
            );
            fs::remove_file(&path)?;
        } else {
            fs::rename(&path, &target)?;
        }
        renamed.push(target);
    }

    renamed.sort();
    Ok(renamed)
}

pub(crate) fn is_png(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|e| e == "png")
}

pub(crate) fn has_dump_prefix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(DUMP_PREFIX))
}

/// Raw file for `image_index`, searched recursively under `raw_dir`.
///
/// The file stem must parse as exactly `image_index` (`002.png` matches 2,
/// `012.png` does not). Zero or several matches are errors.
pub fn find_raw_image(raw_dir: &Path, image_index: u32) -> crate::error::Result<PathBuf> {
    let mut candidates = Vec::new();
    collect_matching(raw_dir, image_index, &mut candidates)?;
    candidates.sort();

    match candidates.len() {
        0 => Err(PietroError::RawImageNotFound {
            image_index,
            dir: raw_dir.to_path_buf(),
        }),
        1 => Ok(candidates.remove(0)),
        _ => Err(PietroError::AmbiguousRawImage {
            image_index,
            candidates,
        }),
    }
}

fn collect_matching(
    dir: &Path,
    image_index: u32,
    out: &mut Vec<PathBuf>,
) -> crate::error::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_matching(&path, image_index, out)?;
        } else if is_png(&path)
            && !has_dump_prefix(&path)
            && raw_index(&path) == Some(image_index)
        {
            out.push(path);
        }
    }
    Ok(())
}

/// Image index encoded in a raw file name (`012.png` -> 12).
fn raw_index(path: &Path) -> Option<u32> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
}
