use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 一個 parquet 檔讀入後的表格 (所有 record batch 合併為一個)
pub type Table = RecordBatch;

pub const MATCHED_KEYWORDS_COLUMN: &str = "matched_keywords";
pub const COMPRESSED_TEXT_COLUMN: &str = "compressed_text";
pub const SENTIMENT_LABEL_COLUMN: &str = "sentiment_label";
pub const SENTIMENT_SCORE_COLUMN: &str = "sentiment_score";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub label: String,
    pub score: f64,
}

/// 單一輸入檔與其輸出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    /// 1 起算的序號，也用於輸出檔名
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    /// 實際送進模型的列數 (不含空值)
    pub analyzed_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    pub input: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub processed: usize,
    pub skipped: Vec<String>,
    pub failed: Vec<FailedJob>,
    pub outputs: Vec<String>,
}

impl BuildSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            processed: 0,
            skipped: Vec::new(),
            failed: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped.len() + self.failed.len()
    }
}
