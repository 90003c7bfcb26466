// Test double for the sandboxed process runner.
//
// Records every invocation and simulates the side effects of the tools the
// pipeline relies on (pdfimages -png dumps files, magick composite writes its
// output) by writing into the mounted host directories.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pietro::manifest::ManifestEntry;
use pietro::runner::{
    GUEST_INPUT_DIR, GUEST_OUTPUT_DIR, ProcessRunner, RunOptions, RunOutput, ToolCommand,
    check_exit,
};

/// `pdfimages -list` output for a 2-image document: a colour image and its soft mask.
pub const IMAGE_WITH_MASK_LIST: &str = "\
page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio
--------------------------------------------------------------------------------------------
   1     0 image    2625  1688  icc     3   8  jpeg   no        72  0   300   300 45.5K 0.4%
   1     1 smask    2625  1688  gray    1   8  image  no        72  0   300   300 8780B 0.2%
";

pub struct FakeRunner {
    image_list: String,
    dumped: Vec<String>,
    responses: Vec<(String, RunOutput)>,
    calls: Mutex<Vec<(ToolCommand, RunOptions)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            image_list: String::new(),
            dumped: Vec::new(),
            responses: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// stdout of `pdfimages -list`.
    pub fn with_image_list(mut self, list: &str) -> Self {
        self.image_list = list.to_string();
        self
    }

    /// Files written by `pdfimages -png` (without the root prefix), e.g. `000.png`.
    pub fn with_dumped_files(mut self, names: &[&str]) -> Self {
        self.dumped = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Answer commands whose command line starts with `prefix` with a canned output.
    pub fn respond(mut self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.responses.push((
            prefix.to_string(),
            RunOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code,
            },
        ));
        self
    }

    pub fn calls(&self) -> Vec<(ToolCommand, RunOptions)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(|(c, _)| c.to_string()).collect()
    }

    pub fn count_starting_with(&self, prefix: &str) -> usize {
        self.command_lines()
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}

fn host_path(guest: &str, options: &RunOptions) -> Option<PathBuf> {
    let guest = guest.strip_prefix("PNG32:").unwrap_or(guest);
    if let Some(name) = guest.strip_prefix(&format!("{GUEST_OUTPUT_DIR}/")) {
        return options.output_directory.as_ref().map(|d| d.join(name));
    }
    if let Some(name) = guest.strip_prefix(&format!("{GUEST_INPUT_DIR}/")) {
        return options.input_directory.as_ref().map(|d| d.join(name));
    }
    None
}

fn failure(stderr: String) -> RunOutput {
    RunOutput {
        stdout: String::new(),
        stderr,
        exit_code: 1,
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, command: &ToolCommand, options: &RunOptions) -> pietro::Result<RunOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((command.clone(), options.clone()));

        let line = command.to_string();
        if let Some((_, output)) = self.responses.iter().find(|(p, _)| line.starts_with(p)) {
            return check_exit(command, options, output.clone());
        }

        let first = command.args.first().map(String::as_str);
        let output = match (command.program.as_str(), first) {
            ("pdfimages", Some("-list")) => RunOutput {
                stdout: self.image_list.clone(),
                ..RunOutput::default()
            },
            ("pdfimages", Some("-png")) => {
                let root = host_path(command.args.last().unwrap(), options).unwrap();
                for name in &self.dumped {
                    let file = format!("{}-{name}", root.display());
                    std::fs::write(file, b"raw png").unwrap();
                }
                RunOutput::default()
            }
            ("magick", Some("composite")) => {
                let n = command.args.len();
                let mask = host_path(&command.args[n - 3], options).unwrap();
                let image = host_path(&command.args[n - 2], options).unwrap();
                let out = host_path(&command.args[n - 1], options).unwrap();
                if !mask.exists() || !image.exists() {
                    failure(format!("magick: unable to open image '{}'", mask.display()))
                } else {
                    std::fs::write(out, b"composited png").unwrap();
                    RunOutput::default()
                }
            }
            ("magick", Some(_)) => {
                let target = host_path(command.args.last().unwrap(), options).unwrap();
                if target.exists() {
                    std::fs::write(target, b"trimmed png").unwrap();
                    RunOutput::default()
                } else {
                    failure(format!("magick: unable to open image '{}'", target.display()))
                }
            }
            _ => RunOutput::default(),
        };
        check_exit(command, options, output)
    }
}

/// Create an empty file standing in for a PDF.
pub fn touch_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.5\n").unwrap();
    path
}

pub fn entry(
    image_index: u32,
    image_type: &str,
    width: u32,
    height: u32,
    color: &str,
    object_id: u32,
) -> ManifestEntry {
    ManifestEntry {
        image_index,
        image_type: image_type.into(),
        width,
        height,
        color: color.to_string(),
        object_id,
        size: "1K".to_string(),
    }
}
