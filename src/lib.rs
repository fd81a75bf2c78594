pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::toml_config::JobConfig;

pub use app::{build_pipeline, run_build, RunOptions};
pub use crate::core::{etl::EtlEngine, jobs::discover_jobs, pipeline::SentimentPipeline};
pub use utils::error::{EtlError, Result};
