pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::JobConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_existing_dir, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cc-sentiment")]
#[command(about = "Build keyword-filtered sentiment datasets from parquet files")]
pub struct CliConfig {
    /// Directory containing the input *.parquet files
    pub input_dir: String,

    /// Directory to write the built datasets to
    pub output_dir: String,

    /// Path to the job TOML configuration
    #[arg(short, long)]
    pub config: Option<String>,

    /// Extra keywords, appended to the configured ones
    #[arg(short, long, value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would be processed without executing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML (未指定時使用預設值) 並套用命令列覆蓋
    pub fn load_job_config(&self) -> Result<JobConfig> {
        let mut config = match &self.config {
            Some(path) => JobConfig::from_file(path)?,
            None => JobConfig::default(),
        };

        config.filter.keywords.extend(self.keywords.iter().cloned());
        if self.monitor {
            config.monitoring.enabled = true;
        }
        if self.json_logs {
            config.monitoring.json_logs = true;
        }

        Ok(config)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_existing_dir("input_dir", &self.input_dir)?;
        validate_existing_dir("output_dir", &self.output_dir)?;
        Ok(())
    }
}
