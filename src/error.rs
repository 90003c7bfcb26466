use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PietroError {
    #[error("The file {} does not exist", .0.display())]
    MissingInputFile(PathBuf),

    #[error("Malformed manifest row {line}: {reason}")]
    MalformedManifestRow { line: usize, reason: String },

    #[error("Manifest header line is empty")]
    EmptyManifestHeader,

    #[error(
        "The image and mask are not located in the same folder:\n- image: {}\n- mask: {}",
        .image.display(),
        .mask.display()
    )]
    MaskImageDirectoryMismatch { image: PathBuf, mask: PathBuf },

    #[error("`{command}` failed (exit code {exit_code}):\n{stderr}")]
    ProcessFailure {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("failed to execute {program}: {source}")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No raw image with index {image_index} in {}", .dir.display())]
    RawImageNotFound { image_index: u32, dir: PathBuf },

    #[error("Several raw images match index {image_index}: {candidates:?}")]
    AmbiguousRawImage {
        image_index: u32,
        candidates: Vec<PathBuf>,
    },

    #[error(
        "All input files should be in the same directory:\n- {}\n- {}",
        .expected.display(),
        .found.display()
    )]
    FilesNotInSameDirectory { expected: PathBuf, found: PathBuf },

    #[error("Unexpected output from {program}: {output:?}")]
    UnexpectedToolOutput { program: String, output: String },

    #[error("illustration {output_index} of {document}: {source}")]
    Illustration {
        document: String,
        output_index: usize,
        #[source]
        source: Box<PietroError>,
    },

    #[error("{document} ({}): {source}", .path.display())]
    Document {
        document: String,
        path: PathBuf,
        #[source]
        source: Box<PietroError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Manifest format error: {0}")]
    ManifestFormatError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`PietroError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl PietroError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create a manifest format error.
    manifest_format => ManifestFormatError,
}

impl PietroError {
    /// Create a missing input file error.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInputFile(path.into())
    }

    /// Strip [`PietroError::Document`] and [`PietroError::Illustration`] tagging
    /// and return the underlying error.
    pub fn root_cause(&self) -> &PietroError {
        match self {
            Self::Document { source, .. } | Self::Illustration { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

impl From<serde_json::Error> for PietroError {
    fn from(e: serde_json::Error) -> Self {
        Self::ManifestFormatError(e.to_string())
    }
}

impl From<serde_yml::Error> for PietroError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PietroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_nested_illustration_errors() {
        let err = PietroError::Illustration {
            document: "042".to_string(),
            output_index: 3,
            source: Box::new(PietroError::MaskImageDirectoryMismatch {
                image: PathBuf::from("/raw/042/000.png"),
                mask: PathBuf::from("/raw/042/sub/001.png"),
            }),
        };
        assert!(matches!(
            err.root_cause(),
            PietroError::MaskImageDirectoryMismatch { .. }
        ));
    }

    #[test]
    fn test_document_tag_names_host_path() {
        let err = PietroError::Document {
            document: "042".to_string(),
            path: PathBuf::from("/books/042.pdf"),
            source: Box::new(PietroError::ProcessFailure {
                command: "pdfimages -list /app/input/042.pdf".to_string(),
                exit_code: 1,
                stderr: "Syntax Error".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("/books/042.pdf"), "got: {msg}");
        assert!(msg.contains("Syntax Error"), "got: {msg}");
        assert!(matches!(
            err.root_cause(),
            PietroError::ProcessFailure { exit_code: 1, .. }
        ));
    }

    #[test]
    fn test_process_failure_message_keeps_stderr_verbatim() {
        let err = PietroError::ProcessFailure {
            command: "magick composite".to_string(),
            exit_code: 1,
            stderr: "magick: unable to open image `x.png'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("magick: unable to open image `x.png'"));
        assert!(msg.contains("exit code 1"));
    }
}
