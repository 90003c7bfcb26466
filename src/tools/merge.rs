// pdfunite による結合

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PietroError;
use crate::layout::{SourcePdf, file_name_of};
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input, guest_output};

/// Merge several PDFs, in order, into `output_file`.
///
/// Only one input directory can be mounted, so every input must live in the
/// same directory as the first one.
pub fn merge_files(
    runner: &dyn ProcessRunner,
    input_files: &[PathBuf],
    output_file: &Path,
) -> crate::error::Result<()> {
    let Some(first) = input_files.first() else {
        return Err(PietroError::config("no input files to merge"));
    };
    let first = SourcePdf::locate(first)?;

    let mut guest_inputs = Vec::with_capacity(input_files.len());
    for input_file in input_files {
        let source = SourcePdf::locate(input_file)?;
        if source.directory != first.directory {
            return Err(PietroError::FilesNotInSameDirectory {
                expected: first.directory.clone(),
                found: source.directory,
            });
        }
        guest_inputs.push(guest_input(&source.file_name));
    }

    let output_file = std::path::absolute(output_file)?;
    let output_directory = output_file.parent().ok_or_else(|| {
        PietroError::config(format!("{} has no parent", output_file.display()))
    })?;
    fs::create_dir_all(output_directory)?;

    let command = ToolCommand::new("pdfunite")
        .args(guest_inputs)
        .arg(guest_output(&file_name_of(&output_file)?));
    runner.run(
        &command,
        &RunOptions::input_output(&first.directory, output_directory),
    )?;
    Ok(())
}
