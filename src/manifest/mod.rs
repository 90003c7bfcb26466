pub mod parser;

use serde::{Deserialize, Serialize};

/// `pdfimages -list` の `type` 列。
///
/// 未知の値も `Other` として文字列のまま保持し、manifest.json の往復で失われないようにする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageType {
    Image,
    Smask,
    Stencil,
    Mask,
    Other(String),
}

impl ImageType {
    pub fn as_str(&self) -> &str {
        match self {
            ImageType::Image => "image",
            ImageType::Smask => "smask",
            ImageType::Stencil => "stencil",
            ImageType::Mask => "mask",
            ImageType::Other(s) => s,
        }
    }
}

impl From<String> for ImageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "image" => ImageType::Image,
            "smask" => ImageType::Smask,
            "stencil" => ImageType::Stencil,
            "mask" => ImageType::Mask,
            _ => ImageType::Other(s),
        }
    }
}

impl From<&str> for ImageType {
    fn from(s: &str) -> Self {
        ImageType::from(s.to_string())
    }
}

impl From<ImageType> for String {
    fn from(t: ImageType) -> Self {
        match t {
            ImageType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// manifest.json の1行 = PDF に埋め込まれた画像オブジェクト1つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// `pdfimages` の連番。抽出済みファイル名 (`<imageIndex>.png`) との結合キー。
    pub image_index: u32,
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub width: u32,
    pub height: u32,
    /// 色空間タグ (`icc`, `gray`, `rgb`, ...)。
    pub color: String,
    /// PDF オブジェクト番号。カラー画像とその soft mask はこの値を共有する。
    #[serde(rename = "objectID")]
    pub object_id: u32,
    /// ツールが報告した人間向けサイズ表記。判定には使わない。
    pub size: String,
}

impl ManifestEntry {
    /// Whether this entry is a grayscale soft mask.
    pub fn is_soft_mask(&self) -> bool {
        self.image_type == ImageType::Smask && self.color == "gray"
    }
}
