use crate::domain::ports::Tokenizer;
use std::collections::HashMap;

const SENTENCE_DELIMITER: char = '。';

/// 單詞出現頻度辞書；未收錄的單詞頻度為 0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDictionary {
    frequencies: HashMap<String, u64>,
}

impl WordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, word: &str) -> u64 {
        self.frequencies.get(word).copied().unwrap_or(0)
    }

    /// 後併入者覆蓋同名鍵
    pub fn merge(&mut self, other: HashMap<String, u64>) {
        self.frequencies.extend(other);
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

impl From<HashMap<String, u64>> for WordDictionary {
    fn from(frequencies: HashMap<String, u64>) -> Self {
        Self { frequencies }
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for WordDictionary {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            frequencies: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// 依單詞頻度刪除低分句子，直到文字長度不超過上限
pub struct FrequencyCompressor<T: Tokenizer> {
    max_length: usize,
    tokenizer: T,
    dictionary: WordDictionary,
}

impl<T: Tokenizer> FrequencyCompressor<T> {
    pub fn new(max_length: usize, tokenizer: T, dictionary: WordDictionary) -> Self {
        Self {
            max_length,
            tokenizer,
            dictionary,
        }
    }

    /// 長度以字元 (Unicode scalar) 計算
    pub fn compress(&self, text: &str) -> String {
        if text.chars().count() <= self.max_length {
            return text.to_string();
        }

        let sentences = split_sentences(text);
        let scores: Vec<f64> = sentences
            .iter()
            .map(|sentence| self.sentence_score(sentence))
            .collect();

        // 穩定排序：同分時較前面的句子先被刪除
        let mut removal_order: Vec<usize> = (0..sentences.len()).collect();
        removal_order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

        // 每句連同結尾的「。」
        let mut kept = vec![true; sentences.len()];
        let mut length: usize = sentences.iter().map(|s| s.chars().count() + 1).sum();

        for index in removal_order {
            kept[index] = false;
            length -= sentences[index].chars().count() + 1;

            if length <= self.max_length {
                // 保留原文順序，不依分數由低到高重排
                let remaining: Vec<&str> = sentences
                    .iter()
                    .zip(&kept)
                    .filter(|(_, keep)| **keep)
                    .map(|(sentence, _)| sentence.as_str())
                    .collect();
                return join_sentences(&remaining);
            }
        }

        String::new()
    }

    /// 句中單詞頻度的平均值；無單詞時為 0
    pub fn sentence_score(&self, sentence: &str) -> f64 {
        let tokens = self.tokenizer.tokenize(sentence);
        if tokens.is_empty() {
            return 0.0;
        }

        let total: u64 = tokens.iter().map(|token| self.dictionary.get(token)).sum();
        total as f64 / tokens.len() as f64
    }
}

/// 以換行與「。」切句，去除前後空白並捨棄空句
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| line.split(SENTENCE_DELIMITER))
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(String::from)
        .collect()
}

pub fn join_sentences(sentences: &[&str]) -> String {
    let mut joined = String::new();
    for sentence in sentences {
        joined.push_str(sentence);
        joined.push(SENTENCE_DELIMITER);
    }
    joined
}
