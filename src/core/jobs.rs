use crate::domain::model::BuildJob;
use crate::utils::error::Result;
use crate::utils::validation::validate_existing_dir;
use std::path::{Path, PathBuf};

pub fn output_file_name(prefix: &str, index: usize) -> String {
    format!("{}{:03}.parquet", prefix, index)
}

/// 偵測輸入目錄下的 `*.parquet` (不遞迴，依檔名排序) 並分配輸出路徑
pub fn discover_jobs(input_dir: &Path, output_dir: &Path, prefix: &str) -> Result<Vec<BuildJob>> {
    validate_existing_dir("input_dir", &input_dir.to_string_lossy())?;
    validate_existing_dir("output_dir", &output_dir.to_string_lossy())?;

    let mut targets: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("parquet")
        })
        .collect();
    targets.sort();

    tracing::debug!(
        "Detected {} parquet files in {}",
        targets.len(),
        input_dir.display()
    );

    Ok(targets
        .into_iter()
        .enumerate()
        .map(|(i, input)| BuildJob {
            index: i + 1,
            input,
            output: output_dir.join(output_file_name(prefix, i + 1)),
        })
        .collect())
}
