pub mod columns;
pub mod compressor;
pub mod dataset_filter;
pub mod keyword_filter;
pub mod tokenizer;

pub use compressor::{FrequencyCompressor, WordDictionary};
pub use dataset_filter::{AcceptAll, MinRowsFilter};
pub use keyword_filter::KeywordFilter;
pub use tokenizer::ScriptTokenizer;
