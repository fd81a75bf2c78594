use crate::domain::model::Table;
use crate::utils::error::Result;
use arrow::compute::concat_batches;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// 讀入整個 parquet 檔，所有 record batch 合併為一個表格
pub fn read_table(data: Vec<u8>) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(data))?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    tracing::debug!(
        "Read {} record batches ({} columns)",
        batches.len(),
        schema.fields().len()
    );

    Ok(concat_batches(&schema, &batches)?)
}

pub fn write_table(table: &Table) -> Result<Vec<u8>> {
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, table.schema(), Some(props))?;
    writer.write(table)?;
    writer.close()?;

    tracing::debug!("Encoded {} rows into {} bytes", table.num_rows(), buffer.len());
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    #[test]
    fn test_written_table_reads_back() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("content", DataType::Utf8, true),
        ]));
        let table = Table::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(StringArray::from(vec![Some("a"), None, Some("日本語")])),
            ],
        )
        .unwrap();

        let bytes = write_table(&table).unwrap();
        let read = read_table(bytes).unwrap();

        assert_eq!(read.num_rows(), 3);
        assert_eq!(read.schema().fields().len(), 2);
        let content = read.column_by_name("content").unwrap().as_string::<i32>();
        assert_eq!(content.value(2), "日本語");
    }

    #[test]
    fn test_empty_table_keeps_schema() {
        let schema = Arc::new(Schema::new(vec![Field::new("content", DataType::Utf8, true)]));
        let table = Table::new_empty(schema);

        let read = read_table(write_table(&table).unwrap()).unwrap();
        assert_eq!(read.num_rows(), 0);
        assert!(read.column_by_name("content").is_some());
    }

    #[test]
    fn test_invalid_bytes_are_rejected() {
        assert!(read_table(b"not a parquet file".to_vec()).is_err());
    }
}
