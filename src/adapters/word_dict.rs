use crate::domain::services::WordDictionary;
use crate::utils::error::{EtlError, Result};
use crate::utils::progress::progress_bar;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 讀取目錄下所有 `*.json` ({word: frequency}) 並依檔名順序合併
pub fn load_word_dict(dir: &Path, show_progress: bool) -> Result<WordDictionary> {
    if !dir.is_dir() {
        return Err(EtlError::ConfigError {
            message: format!("Word dictionary directory not found: {}", dir.display()),
        });
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .collect();
    files.sort();

    if files.is_empty() {
        tracing::warn!("No *.json word dictionaries in {}", dir.display());
    }

    let pb = progress_bar(files.len() as u64, "loading word-dict", !show_progress)?;
    let mut dictionary = WordDictionary::new();

    for file in &files {
        tracing::debug!("Loading word dictionary {}", file.display());
        let content = std::fs::read_to_string(file)?;
        let entries: HashMap<String, u64> = serde_json::from_str(&content)?;
        dictionary.merge(entries);
        pb.inc(1);
    }
    pb.finish_and_clear();

    tracing::info!(
        "Loaded {} words from {} dictionary files",
        dictionary.len(),
        files.len()
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"猫": 3, "犬": 1}"#).unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"犬": 7}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let dictionary = load_word_dict(dir.path(), false).unwrap();
        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.get("猫"), 3);
        assert_eq!(dictionary.get("犬"), 7);
        assert_eq!(dictionary.get("鳥"), 0);
    }

    #[test]
    fn test_missing_directory_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_word_dict(&dir.path().join("missing"), false).unwrap_err();
        assert!(matches!(err, EtlError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "[1, 2]").unwrap();
        let err = load_word_dict(dir.path(), false).unwrap_err();
        assert!(matches!(err, EtlError::SerializationError(_)));
    }
}
