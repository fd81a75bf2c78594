// Adapters layer: concrete implementations for external systems
// (parquet files, the inference endpoint, word dictionaries on disk,
// the morphological analyzer).

pub mod inference;
#[cfg(feature = "ipadic")]
pub mod lindera_tokenizer;
pub mod parquet_codec;
pub mod word_dict;

pub use inference::InferenceApiModel;
#[cfg(feature = "ipadic")]
pub use lindera_tokenizer::LinderaTokenizer;
pub use parquet_codec::{read_table, write_table};
pub use word_dict::load_word_dict;
