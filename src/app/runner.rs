use crate::app::builder::{run_build, RunOptions};
use crate::config::toml_config::JobConfig;
use crate::config::CliConfig;
use crate::core::jobs::discover_jobs;
use crate::core::{BuildJob, BuildSummary};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use std::path::Path;

/// 處理開始前的確認；回傳 false 表示取消
pub trait Confirmation {
    fn confirm(&self, message: &str) -> Result<bool>;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn confirm(&self, message: &str) -> Result<bool> {
        self(message)
    }
}

/// 終端機上的 y/n 提示；Ctrl-C 與 Esc 視為取消
pub struct PromptConfirmation;

impl Confirmation for PromptConfirmation {
    fn confirm(&self, message: &str) -> Result<bool> {
        use inquire::InquireError;

        match inquire::Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(EtlError::ConfigError {
                message: format!("Confirmation prompt failed: {}", e),
            }),
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    NoJobs,
    DryRun(Vec<BuildJob>),
    Cancelled,
    Built(BuildSummary),
}

/// 驗證、偵測輸入檔、確認後執行建置
pub async fn run(
    cli: &CliConfig,
    config: JobConfig,
    confirmation: &dyn Confirmation,
) -> Result<RunOutcome> {
    cli.validate()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated ({})", config.job.name);

    let output_dir = Path::new(&cli.output_dir);
    let jobs = discover_jobs(
        Path::new(&cli.input_dir),
        output_dir,
        &config.build.output_prefix,
    )?;
    log_summary(cli, &config, jobs.len());

    if jobs.is_empty() {
        tracing::warn!("No parquet files found, nothing to do");
        return Ok(RunOutcome::NoJobs);
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(RunOutcome::DryRun(jobs));
    }

    if !cli.yes && !confirmation.confirm("Would you like to continue?")? {
        tracing::info!("cancelled process");
        return Ok(RunOutcome::Cancelled);
    }

    let options = RunOptions::from_config(&config);
    let summary = run_build(config, &jobs, output_dir, options).await?;
    tracing::info!("finished process");

    Ok(RunOutcome::Built(summary))
}

fn log_summary(cli: &CliConfig, config: &JobConfig, detected: usize) {
    tracing::info!("InputDir : {}", cli.input_dir);
    tracing::info!("OutputDir : {}", cli.output_dir);
    tracing::info!("detected {} files in InputDir", detected);
    tracing::info!(
        "Keywords: {} inline{}, text columns: {:?}, analysis column: {}",
        config.filter.keywords.len(),
        if config.filter.keywords_file.is_some() { " + file" } else { "" },
        config.filter.text_columns,
        config.build.text_column
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::write_table;
    use arrow::array::StringArray;
    use arrow::datatypes::{DataType, Field, Schema};
    use arrow::record_batch::RecordBatch;
    use clap::Parser;
    use std::cell::Cell;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Workspace {
        _dir: TempDir,
        input: String,
        output: String,
    }

    fn workspace(files: &[&str]) -> Workspace {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::create_dir_all(&output).unwrap();

        let schema = Arc::new(Schema::new(vec![Field::new("content", DataType::Utf8, true)]));
        let table = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["天気の話だけ"]))],
        )
        .unwrap();
        for name in files {
            std::fs::write(input.join(name), write_table(&table).unwrap()).unwrap();
        }

        Workspace {
            input: input.to_string_lossy().to_string(),
            output: output.to_string_lossy().to_string(),
            _dir: dir,
        }
    }

    fn cli(ws: &Workspace, extra: &[&str]) -> CliConfig {
        let mut args = vec!["cc-sentiment", ws.input.as_str(), ws.output.as_str(), "-k", "ラーメン"];
        args.extend_from_slice(extra);
        CliConfig::parse_from(args)
    }

    fn output_files(ws: &Workspace) -> usize {
        std::fs::read_dir(&ws.output).unwrap().count()
    }

    fn refuse(_: &str) -> Result<bool> {
        Ok(false)
    }

    #[tokio::test]
    async fn test_empty_input_dir_returns_no_jobs() {
        let ws = workspace(&[]);
        let cli = cli(&ws, &[]);
        let config = cli.load_job_config().unwrap();

        let outcome = run(&cli, config, &refuse).await.unwrap();

        assert!(matches!(outcome, RunOutcome::NoJobs));
        assert_eq!(output_files(&ws), 0);
    }

    #[tokio::test]
    async fn test_dry_run_lists_jobs_without_writing() {
        let ws = workspace(&["b.parquet", "a.parquet"]);
        let cli = cli(&ws, &["--dry-run"]);
        let config = cli.load_job_config().unwrap();

        let outcome = run(&cli, config, &refuse).await.unwrap();

        let RunOutcome::DryRun(jobs) = outcome else {
            panic!("expected a dry run, got {:?}", outcome);
        };
        assert_eq!(jobs.len(), 2);
        assert!(jobs[0].input.ends_with("a.parquet"));
        assert!(jobs[1].output.ends_with("cc_sentiment_002.parquet"));
        assert_eq!(output_files(&ws), 0);
    }

    #[tokio::test]
    async fn test_declined_confirmation_cancels() {
        let ws = workspace(&["a.parquet"]);
        let cli = cli(&ws, &[]);
        let config = cli.load_job_config().unwrap();
        let asked = Cell::new(0);
        let decline = |_: &str| -> Result<bool> {
            asked.set(asked.get() + 1);
            Ok(false)
        };

        let outcome = run(&cli, config, &decline).await.unwrap();

        assert!(matches!(outcome, RunOutcome::Cancelled));
        assert_eq!(asked.get(), 1);
        assert_eq!(output_files(&ws), 0);
    }

    #[tokio::test]
    async fn test_yes_skips_confirmation_and_builds() {
        let ws = workspace(&["a.parquet"]);
        let cli = cli(&ws, &["--yes"]);
        let config = cli.load_job_config().unwrap();
        let never_asked = |_: &str| -> Result<bool> { panic!("confirmation must be skipped") };

        // 沒有符合關鍵字的列，因此不會呼叫推論端點
        let outcome = run(&cli, config, &never_asked).await.unwrap();

        let RunOutcome::Built(summary) = outcome else {
            panic!("expected a build, got {:?}", outcome);
        };
        assert_eq!(summary.processed, 1);
        assert!(Path::new(&ws.output).join("cc_sentiment_001.parquet").exists());
        assert!(Path::new(&ws.output).join("build_summary.json").exists());
    }

    #[tokio::test]
    async fn test_missing_input_dir_is_error() {
        let ws = workspace(&[]);
        let missing = format!("{}/missing", ws.input);
        let cli = CliConfig::parse_from(["cc-sentiment", missing.as_str(), ws.output.as_str(), "-k", "a"]);
        let config = cli.load_job_config().unwrap();

        assert!(run(&cli, config, &refuse).await.is_err());
    }
}
