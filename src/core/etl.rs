use crate::config::toml_config::OnFileError;
use crate::core::{BuildJob, BuildSummary, Pipeline, Storage};
use crate::domain::model::FailedJob;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::progress::progress_bar;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
    on_file_error: OnFileError,
    show_progress: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        let monitor = SystemMonitor::new(monitor_enabled);
        if monitor.is_enabled() {
            tracing::info!("📊 System monitoring enabled");
        }

        Self {
            pipeline,
            monitor,
            on_file_error: OnFileError::Fail,
            show_progress: false,
        }
    }

    pub fn with_error_policy(mut self, on_file_error: OnFileError) -> Self {
        self.on_file_error = on_file_error;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 處理單一檔案；被 DatasetFilter 略過時回傳 `None`
    pub async fn run_job(&self, job: &BuildJob) -> Result<Option<String>> {
        tracing::debug!("Extracting {}", job.input.display());
        let Some(table) = self.pipeline.extract(job).await? else {
            return Ok(None);
        };
        self.monitor.log_stats("Extract");

        tracing::debug!("Transforming {} rows", table.num_rows());
        let result = self.pipeline.transform(table).await?;
        tracing::debug!("Analyzed {} rows", result.analyzed_rows);
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(job, result).await?;
        self.monitor.log_stats("Load");

        Ok(Some(output_path))
    }

    pub async fn run(&self, jobs: &[BuildJob]) -> Result<BuildSummary> {
        tracing::info!("Starting dataset build for {} files", jobs.len());
        let mut summary = BuildSummary::start();
        let pb = progress_bar(jobs.len() as u64, "building dataset", !self.show_progress)?;

        for job in jobs {
            let input = job.input.display().to_string();

            match self.run_job(job).await {
                Ok(Some(output_path)) => {
                    tracing::info!("✅ {} -> {}", input, output_path);
                    summary.processed += 1;
                    summary.outputs.push(output_path);
                }
                Ok(None) => summary.skipped.push(input),
                Err(e) if self.on_file_error == OnFileError::Skip => {
                    tracing::error!("❌ {} failed, continuing: {}", input, e);
                    summary.failed.push(FailedJob {
                        input,
                        error: e.to_string(),
                    });
                }
                Err(e) => {
                    pb.abandon();
                    tracing::error!("❌ {} failed: {}", input, e);
                    return Err(e);
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        summary.finish();
        self.monitor.log_final_stats();

        tracing::info!(
            "Build finished: {} processed, {} skipped, {} failed",
            summary.processed,
            summary.skipped.len(),
            summary.failed.len()
        );
        Ok(summary)
    }
}

/// 以 JSON 寫出建置摘要
pub async fn write_summary<S: Storage>(
    storage: &S,
    path: &str,
    summary: &BuildSummary,
) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    storage.write_file(path, json.as_bytes()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Table, TransformResult};
    use crate::utils::error::EtlError;
    use arrow::array::Int32Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::path::PathBuf;
    use std::sync::Arc;

    /// 檔名含 "skip" 者略過，含 "bad" 者失敗
    struct StubPipeline;

    fn table() -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new("v", DataType::Int32, false)]));
        Table::try_new(schema, vec![Arc::new(Int32Array::from(vec![1, 2]))]).unwrap()
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self, job: &BuildJob) -> Result<Option<Table>> {
            let name = job.input.to_string_lossy();
            if name.contains("skip") {
                Ok(None)
            } else if name.contains("bad") {
                Err(EtlError::ProcessingError {
                    message: "broken file".to_string(),
                })
            } else {
                Ok(Some(table()))
            }
        }

        async fn transform(&self, table: Table) -> Result<TransformResult> {
            let analyzed_rows = table.num_rows();
            Ok(TransformResult {
                table,
                analyzed_rows,
            })
        }

        async fn load(&self, job: &BuildJob, _result: TransformResult) -> Result<String> {
            Ok(job.output.to_string_lossy().to_string())
        }
    }

    fn jobs(names: &[&str]) -> Vec<BuildJob> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| BuildJob {
                index: i + 1,
                input: PathBuf::from(name),
                output: PathBuf::from(format!("out_{:03}.parquet", i + 1)),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_run_counts_processed_and_skipped() {
        let engine = EtlEngine::new(StubPipeline);
        let summary = engine
            .run(&jobs(&["a.parquet", "skip.parquet", "c.parquet"]))
            .await
            .unwrap();

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, vec!["skip.parquet"]);
        assert_eq!(summary.outputs, vec!["out_001.parquet", "out_003.parquet"]);
        assert!(summary.finished_at.is_some());
        assert_eq!(summary.total(), 3);
    }

    #[tokio::test]
    async fn test_run_fails_fast_by_default() {
        let engine = EtlEngine::new(StubPipeline);
        let err = engine
            .run(&jobs(&["bad.parquet", "a.parquet"]))
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::ProcessingError { .. }));
    }

    #[tokio::test]
    async fn test_run_skip_policy_records_failures() {
        let engine = EtlEngine::new(StubPipeline).with_error_policy(OnFileError::Skip);
        let summary = engine
            .run(&jobs(&["bad.parquet", "a.parquet"]))
            .await
            .unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].input, "bad.parquet");
        assert!(summary.failed[0].error.contains("broken file"));
    }

    #[cfg(feature = "cli")]
    #[tokio::test]
    async fn test_run_with_monitoring_enabled() {
        let engine = EtlEngine::new_with_monitoring(StubPipeline, true);
        assert!(engine.monitor.is_enabled());

        let summary = engine.run(&jobs(&["a.parquet"])).await.unwrap();
        assert_eq!(summary.processed, 1);
        assert!(!EtlEngine::new(StubPipeline).monitor.is_enabled());
    }

    #[tokio::test]
    async fn test_run_with_no_jobs() {
        let engine = EtlEngine::new(StubPipeline);
        let summary = engine.run(&[]).await.unwrap();
        assert_eq!(summary.total(), 0);
    }
}
