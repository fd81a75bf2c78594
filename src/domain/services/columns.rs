use crate::domain::model::Table;
use crate::utils::error::Result;
use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use std::sync::Arc;

/// 取出表格中存在的文字欄位並轉成 Utf8；不存在的欄位直接忽略
pub fn text_arrays(table: &Table, text_columns: &[String]) -> Result<Vec<StringArray>> {
    let mut arrays = Vec::with_capacity(text_columns.len());

    for name in text_columns {
        let Some(column) = table.column_by_name(name) else {
            tracing::debug!("Text column '{}' not present, skipping", name);
            continue;
        };

        if !can_cast_types(column.data_type(), &DataType::Utf8) {
            tracing::warn!(
                "Column '{}' has type {} which cannot be read as text, skipping",
                name,
                column.data_type()
            );
            continue;
        }

        let utf8 = cast(column, &DataType::Utf8)?;
        arrays.push(utf8.as_string::<i32>().clone());
    }

    Ok(arrays)
}

pub fn cell(column: &StringArray, row: usize) -> Option<&str> {
    if column.is_null(row) {
        None
    } else {
        Some(column.value(row))
    }
}

/// 新增欄位；同名欄位已存在時就地取代
pub fn with_column(table: &Table, field: Field, column: ArrayRef) -> Result<Table> {
    let schema = table.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = table.columns().to_vec();

    match schema.column_with_name(field.name()) {
        Some((index, _)) => {
            fields[index] = Arc::new(field);
            columns[index] = column;
        }
        None => {
            fields.push(Arc::new(field));
            columns.push(column);
        }
    }

    let schema = Schema::new_with_metadata(fields, schema.metadata().clone());
    Ok(Table::try_new(Arc::new(schema), columns)?)
}
