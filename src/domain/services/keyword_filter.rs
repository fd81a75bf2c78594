use crate::domain::model::{Table, MATCHED_KEYWORDS_COLUMN};
use crate::domain::services::columns::{cell, text_arrays, with_column};
use crate::utils::error::Result;
use aho_corasick::AhoCorasick;
use arrow::array::{BooleanArray, ListBuilder, StringArray, StringBuilder};
use arrow::compute::filter_record_batch;
use arrow::datatypes::{DataType, Field};
use rayon::prelude::*;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::Arc;

/// 以 Aho-Corasick 自動機一次比對多個關鍵字
pub struct KeywordFilter {
    automaton: Option<AhoCorasick>,
    patterns: Vec<String>,
    case_sensitive: bool,
    keywords: BTreeSet<String>,
}

impl KeywordFilter {
    pub fn new<I, K>(keywords: I, case_sensitive: bool) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut keywords_set = BTreeSet::new();
        let mut patterns = Vec::new();
        let mut seen = BTreeSet::new();

        for keyword in keywords {
            let keyword = keyword.as_ref();
            if keyword.is_empty() {
                continue;
            }
            keywords_set.insert(keyword.to_string());

            let normalized = if case_sensitive {
                keyword.to_string()
            } else {
                keyword.to_lowercase()
            };
            if seen.insert(normalized.clone()) {
                patterns.push(normalized);
            }
        }

        let automaton = if patterns.is_empty() {
            tracing::warn!("Keyword list is empty, no rows will match");
            None
        } else {
            Some(AhoCorasick::new(&patterns)?)
        };

        tracing::debug!(
            "Built keyword automaton with {} patterns (case_sensitive={})",
            patterns.len(),
            case_sensitive
        );

        Ok(Self {
            automaton,
            patterns,
            case_sensitive,
            keywords: keywords_set,
        })
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    /// 空值 (null) 一律視為不符合
    pub fn contains_any_keyword(&self, text: Option<&str>) -> bool {
        let (Some(automaton), Some(text)) = (&self.automaton, text) else {
            return false;
        };
        automaton.is_match(self.normalize(text).as_ref())
    }

    /// 回傳正規化後 (不分大小寫時為小寫) 的關鍵字，包含重疊出現者
    pub fn find_matched_keywords(&self, text: Option<&str>) -> BTreeSet<String> {
        let (Some(automaton), Some(text)) = (&self.automaton, text) else {
            return BTreeSet::new();
        };
        let text = self.normalize(text);

        automaton
            .find_overlapping_iter(text.as_ref())
            .map(|m| self.patterns[m.pattern().as_usize()].clone())
            .collect()
    }

    fn row_matches(&self, columns: &[StringArray], row: usize) -> bool {
        columns
            .iter()
            .any(|column| self.contains_any_keyword(cell(column, row)))
    }

    pub fn create_filter_mask(
        &self,
        table: &Table,
        text_columns: &[String],
        chunk_size: usize,
        n_jobs: i32,
    ) -> Result<Vec<bool>> {
        let rows = table.num_rows();
        let columns = text_arrays(table, text_columns)?;

        if columns.is_empty() {
            tracing::warn!("None of the text columns {:?} are present", text_columns);
            return Ok(vec![false; rows]);
        }

        let chunk_size = chunk_size.max(1);
        if rows <= chunk_size || n_jobs == 1 {
            return Ok((0..rows)
                .map(|row| self.row_matches(&columns, row))
                .collect());
        }

        let chunks: Vec<Range<usize>> = (0..rows)
            .step_by(chunk_size)
            .map(|start| start..(start + chunk_size).min(rows))
            .collect();
        tracing::debug!(
            "Evaluating {} rows in {} chunks (n_jobs={})",
            rows,
            chunks.len(),
            n_jobs
        );

        let evaluate = || {
            chunks
                .par_iter()
                .map(|range| {
                    range
                        .clone()
                        .map(|row| self.row_matches(&columns, row))
                        .collect::<Vec<bool>>()
                })
                .collect::<Vec<Vec<bool>>>()
        };

        let results = if n_jobs > 1 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(n_jobs as usize)
                .build()?
                .install(evaluate)
        } else {
            evaluate()
        };

        Ok(results.concat())
    }

    pub fn find_matches_in_row(
        &self,
        table: &Table,
        row: usize,
        text_columns: &[String],
    ) -> Result<BTreeSet<String>> {
        let columns = text_arrays(table, text_columns)?;
        Ok(self.collect_row_matches(&columns, row))
    }

    fn collect_row_matches(&self, columns: &[StringArray], row: usize) -> BTreeSet<String> {
        let mut matches = BTreeSet::new();
        for column in columns {
            matches.extend(self.find_matched_keywords(cell(column, row)));
        }
        matches
    }

    /// 只保留含關鍵字的列，並附加 `matched_keywords` 欄位
    pub fn filter_table(
        &self,
        table: &Table,
        text_columns: &[String],
        chunk_size: usize,
        n_jobs: i32,
    ) -> Result<Table> {
        let mask = self.create_filter_mask(table, text_columns, chunk_size, n_jobs)?;
        let filtered = filter_record_batch(table, &BooleanArray::from(mask))?;

        let columns = text_arrays(&filtered, text_columns)?;
        let mut builder = ListBuilder::new(StringBuilder::new());
        for row in 0..filtered.num_rows() {
            for keyword in self.collect_row_matches(&columns, row) {
                builder.values().append_value(keyword);
            }
            builder.append(true);
        }

        tracing::debug!(
            "Keyword filter kept {} of {} rows",
            filtered.num_rows(),
            table.num_rows()
        );

        let field = Field::new(
            MATCHED_KEYWORDS_COLUMN,
            DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
            true,
        );
        with_column(&filtered, field, Arc::new(builder.finish()))
    }
}
