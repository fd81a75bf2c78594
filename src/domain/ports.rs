use crate::domain::model::{BuildJob, ModelResponse, Table, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn keywords(&self) -> &[String];
    fn text_columns(&self) -> &[String];
    fn case_sensitive(&self) -> bool;
    fn chunk_size(&self) -> usize;
    fn n_jobs(&self) -> i32;
    /// 送進模型的欄位
    fn analysis_column(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// `None` 表示此檔案被 DatasetFilter 略過
    async fn extract(&self, job: &BuildJob) -> Result<Option<Table>>;
    async fn transform(&self, table: Table) -> Result<TransformResult>;
    async fn load(&self, job: &BuildJob, result: TransformResult) -> Result<String>;
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// 每個輸入對應一個結果，順序相同
    async fn analyze(&self, texts: &[String]) -> Result<Vec<ModelResponse>>;
}

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// parquet 載入後立即呼叫，回傳 false 則略過該檔案
pub trait DatasetFilter: Send + Sync {
    fn accept(&self, path: &Path, table: &Table) -> bool;
}
