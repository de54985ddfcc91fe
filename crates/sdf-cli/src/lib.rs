pub mod config;
pub mod job;

pub use config::{load_job, AnalysisSpec, JobConfig};
pub use job::{default_output_name, run_job, Analysis, Job, Report};
