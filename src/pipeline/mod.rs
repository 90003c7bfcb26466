pub mod classifier;
pub mod compositor;
pub mod job_runner;
pub mod orchestrator;
pub mod raw_extraction;
