use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// PDF to extract illustrations from.
    pub input: String,
    /// Output root (`raw/` and `illustrations/` are created under it).
    pub output: Option<String>,
    pub concurrency: Option<usize>,
    pub best_effort: Option<bool>,
}

impl JobFile {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let job_file: JobFile = serde_yml::from_str(yaml)?;
        if let Some(job) = job_file.jobs.iter().find(|j| j.concurrency == Some(0)) {
            return Err(crate::error::PietroError::config(format!(
                "job '{}': concurrency must be at least 1",
                job.input
            )));
        }
        Ok(job_file)
    }
}
