use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Image that provides pdfimages / magick / qpdf.
    pub docker_image: String,
    /// Illustrations processed at once per document.
    pub concurrency: usize,
    pub best_effort: bool,
    /// Default output root for jobs that do not set `output`.
    pub output_root: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            docker_image: "pietro".to_string(),
            concurrency: 1,
            best_effort: false,
            output_root: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::PietroError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        if settings.concurrency == 0 {
            return Err(crate::error::PietroError::config(
                "concurrency must be at least 1",
            ));
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
