pub mod etl;
pub mod jobs;
pub mod pipeline;

pub use crate::domain::model::{BuildJob, BuildSummary, ModelResponse, Table, TransformResult};
pub use crate::domain::ports::{
    ConfigProvider, DatasetFilter, Pipeline, SentimentModel, Storage, Tokenizer,
};
pub use crate::utils::error::Result;
