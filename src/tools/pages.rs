// qpdf によるページ数取得・ページ分割

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::PietroError;
use crate::layout::SourcePdf;
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// qpdf exit code for "succeeded, but with warnings".
pub const QPDF_WARNING_EXIT_CODE: i32 = 3;

/// Return the number of pages of a PDF.
pub fn page_count(runner: &dyn ProcessRunner, input_file: &Path) -> crate::error::Result<u32> {
    let source = SourcePdf::locate(input_file)?;
    let command = ToolCommand::new("qpdf")
        .arg("--show-npages")
        .arg(guest_input(&source.file_name));
    let output = runner.run(&command, &RunOptions::input(&source.directory))?;

    output
        .stdout
        .trim()
        .parse()
        .map_err(|_| PietroError::UnexpectedToolOutput {
            program: "qpdf --show-npages".to_string(),
            output: output.stdout,
        })
}

/// Save each page of a PDF to its own file in `output_directory`.
///
/// Malformed PDFs make qpdf exit with [`QPDF_WARNING_EXIT_CODE`] even though
/// every page was written; that code is accepted.
pub fn extract_all_pages(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    output_directory: &Path,
) -> crate::error::Result<()> {
    let source = SourcePdf::locate(input_file)?;
    fs::create_dir_all(output_directory)?;
    let output_directory = std::path::absolute(output_directory)?;

    let command = ToolCommand::new("qpdf")
        .arg("--split-pages")
        .arg(guest_input(&source.file_name))
        .arg(guest_output(&source.file_name));
    let options = RunOptions::input_output(&source.directory, &output_directory)
        .tolerate(QPDF_WARNING_EXIT_CODE);
    let output = runner.run(&command, &options)?;

    if output.exit_code == QPDF_WARNING_EXIT_CODE {
        warn!(
            input = %source.path.display(),
            stderr = %output.stderr.trim(),
            "qpdf split pages with warnings"
        );
    }
    Ok(())
}
