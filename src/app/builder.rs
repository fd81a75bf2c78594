use crate::adapters::{load_word_dict, InferenceApiModel};
use crate::config::cli::LocalStorage;
use crate::config::toml_config::JobConfig;
use crate::core::etl::{write_summary, EtlEngine};
use crate::core::pipeline::SentimentPipeline;
use crate::core::{BuildJob, BuildSummary};
use crate::domain::services::{FrequencyCompressor, MinRowsFilter, WordDictionary};
use crate::utils::error::Result;
use std::path::Path;

#[cfg(feature = "ipadic")]
pub type DefaultTokenizer = crate::adapters::LinderaTokenizer;
#[cfg(not(feature = "ipadic"))]
pub type DefaultTokenizer = crate::domain::services::ScriptTokenizer;

pub type DefaultPipeline =
    SentimentPipeline<LocalStorage, JobConfig, InferenceApiModel, DefaultTokenizer>;

/// 有 IPADIC 時用形態素分割，否則依文字種切詞
pub fn default_tokenizer() -> Result<DefaultTokenizer> {
    #[cfg(feature = "ipadic")]
    {
        crate::adapters::LinderaTokenizer::new()
    }
    #[cfg(not(feature = "ipadic"))]
    {
        tracing::warn!("Built without the ipadic feature, tokenizing by character script");
        Ok(crate::domain::services::ScriptTokenizer::new())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub monitor: bool,
    pub show_progress: bool,
}

impl RunOptions {
    /// JSON 日誌模式下不畫進度條
    pub fn from_config(config: &JobConfig) -> Self {
        Self {
            monitor: config.monitoring.enabled,
            show_progress: !config.monitoring.json_logs,
        }
    }
}

/// 依設定組裝：關鍵字、頻度辞書、推論端點、DatasetFilter
pub fn build_pipeline(mut config: JobConfig, show_progress: bool) -> Result<DefaultPipeline> {
    config.resolve_keywords()?;

    let dictionary = match &config.compress.dictionary_dir {
        Some(dir) => load_word_dict(dir, show_progress)?,
        None => {
            tracing::warn!("No compress.dictionary_dir set, sentences are dropped in order");
            WordDictionary::new()
        }
    };
    let compressor =
        FrequencyCompressor::new(config.compress.max_length, default_tokenizer()?, dictionary);
    let model = InferenceApiModel::from_config(&config.model)?;
    tracing::debug!("Using sentiment endpoint {}", model.endpoint());

    let min_rows = config.build.min_rows;
    let pipeline = SentimentPipeline::new(LocalStorage::default(), config, model, compressor)?;

    Ok(match min_rows {
        Some(min_rows) => pipeline.with_dataset_filter(MinRowsFilter { min_rows }),
        None => pipeline,
    })
}

pub async fn run_build(
    config: JobConfig,
    jobs: &[BuildJob],
    output_dir: &Path,
    options: RunOptions,
) -> Result<BuildSummary> {
    let on_file_error = config.build.on_file_error;
    let summary_file = config.build.summary_file.clone();
    let monitor = options.monitor || config.monitoring.enabled;

    let pipeline = build_pipeline(config, options.show_progress)?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor)
        .with_error_policy(on_file_error)
        .with_progress(options.show_progress);

    let summary = engine.run(jobs).await?;

    if let Some(name) = summary_file {
        let path = output_dir.join(name);
        write_summary(&LocalStorage::default(), &path.to_string_lossy(), &summary).await?;
        tracing::info!("📝 Summary written to {}", path.display());
    }

    Ok(summary)
}
