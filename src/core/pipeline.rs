use crate::adapters::parquet_codec::{read_table, write_table};
use crate::core::{
    BuildJob, ConfigProvider, DatasetFilter, Pipeline, SentimentModel, Storage, Table, Tokenizer,
    TransformResult,
};
use crate::domain::model::{COMPRESSED_TEXT_COLUMN, SENTIMENT_LABEL_COLUMN, SENTIMENT_SCORE_COLUMN};
use crate::domain::services::columns::{cell, text_arrays, with_column};
use crate::domain::services::{AcceptAll, FrequencyCompressor, KeywordFilter};
use crate::utils::error::{EtlError, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field};
use std::sync::Arc;

/// 關鍵字過濾 → 文字壓縮 → 情感分類 → parquet 輸出
pub struct SentimentPipeline<S: Storage, C: ConfigProvider, M: SentimentModel, T: Tokenizer> {
    storage: S,
    config: C,
    model: M,
    compressor: FrequencyCompressor<T>,
    keyword_filter: KeywordFilter,
    dataset_filter: Box<dyn DatasetFilter>,
}

impl<S, C, M, T> SentimentPipeline<S, C, M, T>
where
    S: Storage,
    C: ConfigProvider,
    M: SentimentModel,
    T: Tokenizer,
{
    pub fn new(storage: S, config: C, model: M, compressor: FrequencyCompressor<T>) -> Result<Self> {
        let keyword_filter = KeywordFilter::new(config.keywords(), config.case_sensitive())?;

        Ok(Self {
            storage,
            config,
            model,
            compressor,
            keyword_filter,
            dataset_filter: Box::new(AcceptAll),
        })
    }

    /// 載入 parquet 後呼叫的過濾掛鉤
    pub fn with_dataset_filter<F: DatasetFilter + 'static>(mut self, filter: F) -> Self {
        self.dataset_filter = Box::new(filter);
        self
    }
}

#[async_trait::async_trait]
impl<S, C, M, T> Pipeline for SentimentPipeline<S, C, M, T>
where
    S: Storage,
    C: ConfigProvider,
    M: SentimentModel,
    T: Tokenizer,
{
    async fn extract(&self, job: &BuildJob) -> Result<Option<Table>> {
        let input = job.input.to_string_lossy();
        tracing::debug!("Reading {}", input);

        let data = self.storage.read_file(&input).await?;
        let table = read_table(data)?;

        if !self.dataset_filter.accept(&job.input, &table) {
            tracing::info!("⏭️  Skipped {} by dataset filter", input);
            return Ok(None);
        }

        let filtered = self.keyword_filter.filter_table(
            &table,
            self.config.text_columns(),
            self.config.chunk_size(),
            self.config.n_jobs(),
        )?;

        tracing::info!(
            "Matched {} of {} rows in {}",
            filtered.num_rows(),
            table.num_rows(),
            input
        );
        Ok(Some(filtered))
    }

    async fn transform(&self, table: Table) -> Result<TransformResult> {
        let column_name = self.config.analysis_column();
        if table.column_by_name(column_name).is_none() {
            return Err(EtlError::ProcessingError {
                message: format!("Analysis column '{}' not found", column_name),
            });
        }

        let texts = text_arrays(&table, &[column_name.to_string()])?;
        let Some(texts) = texts.first() else {
            return Err(EtlError::ProcessingError {
                message: format!("Analysis column '{}' cannot be read as text", column_name),
            });
        };

        let compressed: Vec<Option<String>> = (0..table.num_rows())
            .map(|row| cell(texts, row).map(|text| self.compressor.compress(text)))
            .collect();

        // 空值不送進模型
        let inputs: Vec<String> = compressed.iter().flatten().cloned().collect();
        let responses = self.model.analyze(&inputs).await?;
        if responses.len() != inputs.len() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Sentiment model returned {} results for {} texts",
                    responses.len(),
                    inputs.len()
                ),
            });
        }

        let mut responses = responses.into_iter();
        let mut labels: Vec<Option<String>> = Vec::with_capacity(compressed.len());
        let mut scores: Vec<Option<f64>> = Vec::with_capacity(compressed.len());
        for text in &compressed {
            match text.as_ref().and_then(|_| responses.next()) {
                Some(response) => {
                    labels.push(Some(response.label));
                    scores.push(Some(response.score));
                }
                None => {
                    labels.push(None);
                    scores.push(None);
                }
            }
        }

        let table = with_column(
            &table,
            Field::new(COMPRESSED_TEXT_COLUMN, DataType::Utf8, true),
            Arc::new(StringArray::from(compressed)),
        )?;
        let table = with_column(
            &table,
            Field::new(SENTIMENT_LABEL_COLUMN, DataType::Utf8, true),
            Arc::new(StringArray::from(labels)),
        )?;
        let table = with_column(
            &table,
            Field::new(SENTIMENT_SCORE_COLUMN, DataType::Float64, true),
            Arc::new(Float64Array::from(scores)),
        )?;

        tracing::debug!("Analyzed {} texts", inputs.len());
        Ok(TransformResult {
            table,
            analyzed_rows: inputs.len(),
        })
    }

    async fn load(&self, job: &BuildJob, result: TransformResult) -> Result<String> {
        let output = job.output.to_string_lossy().to_string();
        let data = write_table(&result.table)?;

        tracing::debug!("Writing parquet file ({} bytes) to {}", data.len(), output);
        self.storage.write_file(&output, &data).await?;

        Ok(output)
    }
}
