// docker run ラッパー: 入出力ディレクトリを /app/input, /app/output にマウントして実行する

use std::path::Path;
use std::process::Command;

use tracing::debug;
use uuid::Uuid;

use crate::error::PietroError;
use crate::runner::{
    GUEST_INPUT_DIR, GUEST_OUTPUT_DIR, ProcessRunner, RunOptions, RunOutput, ToolCommand,
    check_exit,
};

/// Runs each command in a throwaway container of `image`.
///
/// docker must be available in PATH and the image must contain the PDF tools
/// (`pdfimages`, `magick`, `qpdf`, ...).
#[derive(Debug, Clone)]
pub struct DockerRunner {
    image: String,
}

impl DockerRunner {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    /// Check whether the image has been built already.
    pub fn image_exists(&self) -> bool {
        Command::new("docker")
            .args(["image", "inspect", "--format", "{{.Id}}"])
            .arg(&self.image)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Arguments passed to `docker` for one invocation.
    pub fn docker_args(&self, command: &ToolCommand, options: &RunOptions) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        if let Some(dir) = &options.input_directory {
            args.push("--volume".to_string());
            args.push(volume(dir, GUEST_INPUT_DIR));
        }
        if let Some(dir) = &options.output_directory {
            args.push("--volume".to_string());
            args.push(volume(dir, GUEST_OUTPUT_DIR));
        }
        args.push("--name".to_string());
        args.push(format!("{}_{}", self.image, Uuid::new_v4()));
        args.push(self.image.clone());
        args.push(command.program.clone());
        args.extend(command.args.iter().cloned());
        args
    }
}

fn volume(host: &Path, guest: &str) -> String {
    format!("{}:{guest}", host.display())
}

impl ProcessRunner for DockerRunner {
    fn run(&self, command: &ToolCommand, options: &RunOptions) -> crate::error::Result<RunOutput> {
        let args = self.docker_args(command, options);
        debug!(command = %command, image = %self.image, "docker run");

        let output = Command::new("docker")
            .args(&args)
            .output()
            .map_err(|source| PietroError::ProcessSpawn {
                program: "docker".to_string(),
                source,
            })?;

        let captured = RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // Killed by a signal: no exit code available
            exit_code: output.status.code().unwrap_or(-1),
        };
        check_exit(command, options, captured)
    }
}
