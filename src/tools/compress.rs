// ocrmypdf による最適化（OCR はしない: --skip-text）

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PietroError;
use crate::layout::{SourcePdf, file_name_of};
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// Compress a PDF.
///
/// Without `output_file` the input is replaced: the result is written to
/// `<name>.tmp.pdf` next to it, then moved over the original.
pub fn compress(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    output_file: Option<&Path>,
) -> crate::error::Result<()> {
    let source = SourcePdf::locate(input_file)?;

    let in_place = output_file.is_none();
    let output_file = match output_file {
        Some(path) => std::path::absolute(path)?,
        None => in_place_tmp_path(&source.path),
    };
    let output_directory = output_file.parent().ok_or_else(|| {
        PietroError::config(format!("{} has no parent", output_file.display()))
    })?;
    fs::create_dir_all(output_directory)?;

    let command = ToolCommand::new("ocrmypdf")
        .args(["--output-type", "pdf"])
        .args(["--optimize", "3"])
        .arg("--skip-text")
        .arg(guest_input(&source.file_name))
        .arg(guest_output(&file_name_of(&output_file)?));
    runner.run(
        &command,
        &RunOptions::input_output(&source.directory, output_directory),
    )?;

    if in_place {
        fs::rename(&output_file, &source.path)?;
    }
    Ok(())
}

/// `book.pdf` -> `book.tmp.pdf`
fn in_place_tmp_path(input: &Path) -> PathBuf {
    input.with_extension("tmp.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_place_tmp_path() {
        assert_eq!(
            in_place_tmp_path(Path::new("/books/042.pdf")),
            PathBuf::from("/books/042.tmp.pdf")
        );
    }
}
