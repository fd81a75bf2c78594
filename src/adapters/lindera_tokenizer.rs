use crate::domain::ports::Tokenizer;
use crate::domain::services::ScriptTokenizer;
use crate::utils::error::{EtlError, Result};
use lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer as LinderaSegmenter;

/// 以 Lindera (內嵌 IPADIC) 進行形態素分割
///
/// 頻度辭典以形態素為鍵，所以「食べた」必須切成「食べ」「た」才查得到。
pub struct LinderaTokenizer {
    inner: LinderaSegmenter,
}

impl LinderaTokenizer {
    pub fn new() -> Result<Self> {
        let dictionary =
            load_dictionary_from_kind(DictionaryKind::IPADIC).map_err(|e| {
                EtlError::TokenizerError {
                    message: format!("Cannot load embedded IPADIC dictionary: {}", e),
                }
            })?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        tracing::debug!("Lindera tokenizer ready (IPADIC, normal mode)");

        Ok(Self {
            inner: LinderaSegmenter::new(segmenter),
        })
    }
}

impl Tokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        match self.inner.tokenize(text) {
            Ok(tokens) => tokens
                .iter()
                .map(|token| token.text.trim())
                .filter(|surface| !surface.is_empty())
                .map(String::from)
                .collect(),
            Err(e) => {
                // 分割失敗時退回依文字種切詞，句子仍可計分
                tracing::warn!("Lindera failed to tokenize, using script split: {}", e);
                ScriptTokenizer::new().tokenize(text)
            }
        }
    }
}
