use std::path::Path;

use crate::layout::SourcePdf;
use crate::runner::{ProcessRunner, RunOptions, ToolCommand, guest_input};

/// Set the metadata title of a PDF, in place.
///
/// The title travels as a single argument, so spaces need no escaping.
pub fn set_title(
    runner: &dyn ProcessRunner,
    input_file: &Path,
    title: &str,
) -> crate::error::Result<()> {
    let source = SourcePdf::locate(input_file)?;
    let command = ToolCommand::new("exiftool")
        .arg(format!("-Title={title}"))
        .arg("-overwrite_original")
        .arg(guest_input(&source.file_name));
    runner.run(&command, &RunOptions::input(&source.directory))?;
    Ok(())
}
