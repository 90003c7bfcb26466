use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pietro::config::job::JobFile;
use pietro::config::merged::MergedConfig;
use pietro::config::{self};
use pietro::pipeline::job_runner::JobConfig;
use pietro::pipeline::orchestrator::run_all_jobs;
use pietro::runner::docker::DockerRunner;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pietro <jobs.yaml>...");
        eprintln!("  Extract illustrations from PDF files according to job specifications.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pietro {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logging();

    // Jobs are grouped by docker image, since settings are per job file.
    let mut batches: Vec<(String, Vec<JobConfig>)> = Vec::new();

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file = match JobFile::from_yaml(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);
            let job_config = JobConfig {
                input_path: resolve_path(&job_dir, Path::new(&job.input)),
                output_root: resolve_path(&job_dir, &merged.output_root),
                composition: merged.composition_options(),
            };

            match batches
                .iter_mut()
                .find(|(image, _)| *image == merged.docker_image)
            {
                Some((_, jobs)) => jobs.push(job_config),
                None => batches.push((merged.docker_image.clone(), vec![job_config])),
            }
        }
    }

    let mut has_error = false;
    for (image, jobs) in &batches {
        let runner = DockerRunner::new(image.as_str());
        if !runner.image_exists() {
            eprintln!("ERROR: docker image '{image}' is not available; build it first");
            has_error = true;
            continue;
        }

        let results = run_all_jobs(&runner, jobs);

        for (i, result) in results.iter().enumerate() {
            match result {
                Ok(report) => {
                    eprintln!(
                        "OK: {} -> {} ({} illustrations)",
                        report.input_path.display(),
                        report.illustrations_dir.display(),
                        report.illustrations.len()
                    );
                    for failure in &report.failures {
                        eprintln!("ERROR: {}: {failure}", report.input_path.display());
                        has_error = true;
                    }
                }
                Err(e) => {
                    eprintln!("ERROR: {}: {e}", jobs[i].input_path.display());
                    has_error = true;
                }
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging() {
    // Use RUST_LOG if set, otherwise default to info level for our crate
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pietro=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
