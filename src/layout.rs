// 出力ディレクトリ構成
//
// <output_root>/raw/<doc>/manifest.json
// <output_root>/raw/<doc>/<imageIndex>.png
// <output_root>/illustrations/<doc>/<outputIndex>.png

use std::path::{Path, PathBuf};

use crate::error::PietroError;

pub const RAW_DIR: &str = "raw";
pub const ILLUSTRATIONS_DIR: &str = "illustrations";
pub const MANIFEST_FILE: &str = "manifest.json";

/// An existing PDF on the host, split into the pieces a mount needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePdf {
    pub path: PathBuf,
    /// Parent directory, mounted as the guest input directory.
    pub directory: PathBuf,
    pub file_name: String,
}

impl SourcePdf {
    /// 入力ファイルの存在を確認し、絶対パスに解決する。
    ///
    /// 存在しなければ副作用を起こす前に `MissingInputFile` を返す。
    pub fn locate(path: &Path) -> crate::error::Result<Self> {
        if !path.is_file() {
            return Err(PietroError::missing_input(path));
        }
        let path = std::path::absolute(path)?;
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| PietroError::config(format!("{} has no parent", path.display())))?;
        let file_name = file_name_of(&path)?;
        Ok(Self {
            path,
            directory,
            file_name,
        })
    }
}

/// ドキュメント1つ分のパス群。`<doc>` は入力ファイル名から拡張子を除いたもの。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    document: String,
    raw_dir: PathBuf,
    illustrations_dir: PathBuf,
}

impl DocumentLayout {
    pub fn new(input_file: &Path, output_root: &Path) -> crate::error::Result<Self> {
        let document = document_name(input_file)?;
        let output_root = std::path::absolute(output_root)?;
        Ok(Self {
            raw_dir: output_root.join(RAW_DIR).join(&document),
            illustrations_dir: output_root.join(ILLUSTRATIONS_DIR).join(&document),
            document,
        })
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.raw_dir.join(MANIFEST_FILE)
    }

    pub fn illustrations_dir(&self) -> &Path {
        &self.illustrations_dir
    }

    pub fn illustration_path(&self, output_index: usize) -> PathBuf {
        self.illustrations_dir.join(format!("{output_index}.png"))
    }

    /// Work file an illustration is built in before being moved to
    /// [`illustration_path`](Self::illustration_path).
    pub fn illustration_work_path(&self, output_index: usize) -> PathBuf {
        self.illustrations_dir.join(format!("{output_index}.tmp.png"))
    }
}

/// File name without its final extension (`042.pdf` -> `042`).
pub fn document_name(input_file: &Path) -> crate::error::Result<String> {
    input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            PietroError::config(format!(
                "cannot derive a document name from '{}'",
                input_file.display()
            ))
        })
}

pub(crate) fn file_name_of(path: &Path) -> crate::error::Result<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PietroError::config(format!("'{}' has no UTF-8 file name", path.display()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_name_strips_extension() {
        assert_eq!(document_name(Path::new("/books/042.pdf")).unwrap(), "042");
        assert_eq!(
            document_name(Path::new("flee.mortals.pdf")).unwrap(),
            "flee.mortals"
        );
    }

    #[test]
    fn test_layout_paths() {
        let layout = DocumentLayout::new(Path::new("/in/042.pdf"), Path::new("/out")).unwrap();
        assert_eq!(layout.document(), "042");
        assert_eq!(layout.raw_dir(), Path::new("/out/raw/042"));
        assert_eq!(
            layout.manifest_path(),
            PathBuf::from("/out/raw/042/manifest.json")
        );
        assert_eq!(
            layout.illustration_path(7),
            PathBuf::from("/out/illustrations/042/7.png")
        );
        assert_eq!(
            layout.illustration_work_path(7),
            PathBuf::from("/out/illustrations/042/7.tmp.png")
        );
    }
}
