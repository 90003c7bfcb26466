use std::fs;
use std::path::Path;

use crate::error::PietroError;
use crate::layout::{SourcePdf, file_name_of};
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// Return the text content of a PDF.
pub fn get_text(runner: &dyn ProcessRunner, input_file: &Path) -> crate::error::Result<String> {
    let source = SourcePdf::locate(input_file)?;
    let command = ToolCommand::new("pdftotext")
        .arg(guest_input(&source.file_name))
        .arg("-");
    let output = runner.run(&command, &RunOptions::input(&source.directory))?;
    Ok(output.stdout)
}

/// Write the text content of a PDF to `output_file`.
pub fn extract_text(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    output_file: &Path,
) -> crate::error::Result<()> {
    let source = SourcePdf::locate(input_file)?;
    let output_file = std::path::absolute(output_file)?;
    let output_directory = output_file.parent().ok_or_else(|| {
        PietroError::config(format!("{} has no parent", output_file.display()))
    })?;
    fs::create_dir_all(output_directory)?;

    let command = ToolCommand::new("pdftotext")
        .arg(guest_input(&source.file_name))
        .arg(guest_output(&file_name_of(&output_file)?));
    runner.run(
        &command,
        &RunOptions::input_output(&source.directory, output_directory),
    )?;
    Ok(())
}
