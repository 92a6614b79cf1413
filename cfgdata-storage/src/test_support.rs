//! 集成测试用的构造工具
//!
//! 非法文件（越界计数、截断）无法通过 `TableWriter` 生成，这里直接拼字节。

use cfgdata_domain::{Column, FieldType, Value};

pub use crate::writer::{ByteWriter, EncodeError, TableWriter};

/// 按 (列名, 类型) 与行值生成一个合法的数据文件
pub fn table_bytes(columns: &[(&str, FieldType)], rows: Vec<Vec<Value<'_>>>) -> Result<Vec<u8>, EncodeError> {
  let columns = columns.iter().map(|(name, ty)| Column::new(*name, *ty)).collect();
  let mut writer = TableWriter::new(columns)?;
  for row in rows {
    writer.push_row(row)?;
  }
  Ok(writer.finish())
}

/// 只有 FieldCount / RowCount 的表头（计数不做校验）
pub fn raw_header(field_count: i32, row_count: i32) -> Vec<u8> {
  let mut writer = ByteWriter::with_capacity(8);
  writer.write_i32(field_count);
  writer.write_i32(row_count);
  writer.into_inner()
}

/// 表头 + 列定义，行数据由调用方追加（标签不做校验）
pub fn header_with_columns(columns: &[(&str, i32)], row_count: i32) -> ByteWriter {
  let mut writer = ByteWriter::new();
  writer.write_i32(columns.len() as i32);
  writer.write_i32(row_count);
  for (name, tag) in columns {
    writer.write_string(name);
    writer.write_i32(*tag);
  }
  writer
}
