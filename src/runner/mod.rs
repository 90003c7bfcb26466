pub mod docker;

use std::fmt;
use std::path::PathBuf;

use crate::error::PietroError;

/// Host directory mounted here is readable by the guest command.
pub const GUEST_INPUT_DIR: &str = "/app/input";
/// Host directory mounted here receives the guest command's output files.
pub const GUEST_OUTPUT_DIR: &str = "/app/output";

/// Path of `name` inside the mounted input directory.
pub fn guest_input(name: &str) -> String {
    format!("{GUEST_INPUT_DIR}/{name}")
}

/// Path of `name` inside the mounted output directory.
pub fn guest_output(name: &str) -> String {
    format!("{GUEST_OUTPUT_DIR}/{name}")
}

/// A command to run inside the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Mounts and exit-code policy for one invocation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Mounted on [`GUEST_INPUT_DIR`].
    pub input_directory: Option<PathBuf>,
    /// Mounted on [`GUEST_OUTPUT_DIR`].
    pub output_directory: Option<PathBuf>,
    /// Non-zero exit codes that mean "completed with warnings".
    pub tolerated_exit_codes: Vec<i32>,
}

impl RunOptions {
    pub fn input(dir: impl Into<PathBuf>) -> Self {
        Self {
            input_directory: Some(dir.into()),
            ..Self::default()
        }
    }

    pub fn input_output(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_directory: Some(input.into()),
            output_directory: Some(output.into()),
            ..Self::default()
        }
    }

    pub fn tolerate(mut self, exit_code: i32) -> Self {
        self.tolerated_exit_codes.push(exit_code);
        self
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs external tools with directories mounted into an isolated environment.
///
/// Implementations must return [`PietroError::ProcessFailure`] for a non-zero
/// exit code that is not listed in [`RunOptions::tolerated_exit_codes`];
/// [`check_exit`] does that check.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, command: &ToolCommand, options: &RunOptions) -> crate::error::Result<RunOutput>;
}

/// Turn a captured output into `Ok`/`ProcessFailure` according to `options`.
pub fn check_exit(
    command: &ToolCommand,
    options: &RunOptions,
    output: RunOutput,
) -> crate::error::Result<RunOutput> {
    if output.exit_code == 0 || options.tolerated_exit_codes.contains(&output.exit_code) {
        Ok(output)
    } else {
        Err(PietroError::ProcessFailure {
            command: command.to_string(),
            exit_code: output.exit_code,
            stderr: output.stderr,
        })
    }
}
