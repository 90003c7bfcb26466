use std::path::PathBuf;

use super::job::Job;
use super::settings::Settings;
use crate::pipeline::compositor::{CompositionOptions, FailurePolicy};

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub docker_image: String,
    pub output_root: PathBuf,
    pub concurrency: usize,
    pub best_effort: bool,
}

impl MergedConfig {
    /// JobのOption値がSomeならJobの値を、NoneならSettingsの値を使用する。
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            docker_image: settings.docker_image.clone(),
            output_root: job
                .output
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or_else(|| settings.output_root.clone()),
            concurrency: job.concurrency.unwrap_or(settings.concurrency),
            best_effort: job.best_effort.unwrap_or(settings.best_effort),
        }
    }

    pub fn composition_options(&self) -> CompositionOptions {
        CompositionOptions {
            concurrency: self.concurrency,
            policy: if self.best_effort {
                FailurePolicy::BestEffort
            } else {
                FailurePolicy::FailFast
            },
            skip_existing: false,
        }
    }
}
