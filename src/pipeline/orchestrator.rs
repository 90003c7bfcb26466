// 全ジョブ実行

use rayon::prelude::*;

use crate::pipeline::job_runner::{ExtractionReport, JobConfig, run_job};
use crate::runner::ProcessRunner;

/// Run multiple jobs, collecting results in job order.
/// Documents are independent, so they run in parallel; one job failure does
/// NOT prevent other jobs from running.
pub fn run_all_jobs(
    runner: &dyn ProcessRunner,
    jobs: &[JobConfig],
) -> Vec<crate::error::Result<ExtractionReport>> {
    jobs.par_iter().map(|job| run_job(runner, job)).collect()
}
