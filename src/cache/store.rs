// manifest.json キャッシュ: 一度作成したら pdfimages -list を再実行しない

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::PietroError;
use crate::layout::{DocumentLayout, SourcePdf};
use crate::manifest::ManifestEntry;
use crate::manifest::parser::parse_image_list;
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input};

/// ファイルシステム上の manifest.json。
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn for_layout(layout: &DocumentLayout) -> Self {
        Self::new(layout.manifest_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn load(&self) -> crate::error::Result<Vec<ManifestEntry>> {
        let json = fs::read_to_string(&self.path)?;
        serde_json::from_str(&json).map_err(|e| {
            PietroError::manifest_format(format!("{}: {e}", self.path.display()))
        })
    }

    /// manifest を保存する。
    ///
    /// 書き込みはアトミック: 一時ファイルに書き込み、最後にrenameで最終パスに移動する。
    pub fn save(&self, entries: &[ManifestEntry]) -> crate::error::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes())?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// manifest を読み込む。キャッシュが無ければ `pdfimages -list` で作成して保存する。
///
/// 同じPDFに対して2回目以降の呼び出しは外部ツールを起動しない。
/// 不正な行は警告として記録され、manifest からは除外される。
pub fn ensure_manifest(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    base_dir: &Path,
) -> crate::error::Result<Vec<ManifestEntry>> {
    let layout = DocumentLayout::new(input_file, base_dir)?;
    let store = ManifestStore::for_layout(&layout);

    if store.exists() {
        debug!(manifest = %store.path().display(), "manifest already cached");
        return store.load();
    }

    let source = SourcePdf::locate(input_file)?;
    let command = ToolCommand::new("pdfimages")
        .arg("-list")
        .arg(guest_input(&source.file_name));
    let output = runner.run(&command, &RunOptions::input(&source.directory))?;

    let parsed = parse_image_list(&output.stdout)?;
    store.save(&parsed.entries)?;

    info!(
        document = layout.document(),
        images = parsed.entries.len(),
        malformed_rows = parsed.warnings.len(),
        "manifest created"
    );
    Ok(parsed.entries)
}
