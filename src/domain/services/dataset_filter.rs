use crate::domain::model::Table;
use crate::domain::ports::DatasetFilter;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl DatasetFilter for AcceptAll {
    fn accept(&self, _path: &Path, _table: &Table) -> bool {
        true
    }
}

/// 列數不足 `min_rows` 的檔案不處理
#[derive(Debug, Clone, Copy)]
pub struct MinRowsFilter {
    pub min_rows: usize,
}

impl DatasetFilter for MinRowsFilter {
    fn accept(&self, path: &Path, table: &Table) -> bool {
        let accepted = table.num_rows() >= self.min_rows;
        if !accepted {
            tracing::info!(
                "Skipping {} ({} rows < min_rows {})",
                path.display(),
                table.num_rows(),
                self.min_rows
            );
        }
        accepted
    }
}

impl<F> DatasetFilter for F
where
    F: Fn(&Path, &Table) -> bool + Send + Sync,
{
    fn accept(&self, path: &Path, table: &Table) -> bool {
        self(path, table)
    }
}
