//! 表头编解码
//!
//! 布局（小端序）:
//!
//! | 偏移 | 内容 |
//! |------|------|
//! | 0    | i32 FieldCount |
//! | 4    | i32 RowCount |
//! | 8    | FieldCount × (7-bit 长度前缀的 UTF-8 名称, i32 类型标签) |

use cfgdata_domain::{Column, FieldType, TableHeader};

use crate::decoder::{truncated, DecodeError, Location};
use crate::reader::ByteReader;
use crate::writer::ByteWriter;

/// 表头最小字节数（FieldCount + RowCount）
pub const MIN_HEADER_SIZE: usize = 8;

/// 列数上限（含）
pub const MAX_FIELD_COUNT: i32 = 1000;

/// 行数上限（含）
pub const MAX_ROW_COUNT: i32 = 1_000_000;

/// 解码表头并把游标推进到第一行数据
///
/// 校验顺序：数据长度 -> FieldCount -> RowCount -> 逐列定义。
/// 未知类型标签的列会记录一条 warn 日志，然后按 String 处理。
pub fn decode_header(reader: &mut ByteReader<'_>) -> Result<TableHeader, DecodeError> {
  if reader.len() < MIN_HEADER_SIZE {
    return Err(DecodeError::HeaderTooSmall { len: reader.len() });
  }

  let field_count = reader.read_i32().map_err(truncated(Location::Header))?;
  let row_count = reader.read_i32().map_err(truncated(Location::Header))?;

  if !(0..=MAX_FIELD_COUNT).contains(&field_count) {
    return Err(DecodeError::InvalidFieldCount(field_count));
  }
  if !(0..=MAX_ROW_COUNT).contains(&row_count) {
    return Err(DecodeError::InvalidRowCount(row_count));
  }

  // 上面已校验非负
  let field_count = field_count as usize;
  let row_count = row_count as usize;

  let mut columns = Vec::with_capacity(field_count.min(reader.remaining()));
  for index in 0..field_count {
    let name = reader.read_string().map_err(truncated(Location::Column { index }))?;
    let tag = reader.read_i32().map_err(truncated(Location::Column { index }))?;

    let field_type = FieldType::from_tag(tag);
    if field_type.is_unknown() {
      tracing::warn!(column = %name, tag, "unknown field type tag, decoding column as string");
    }
    columns.push(Column::new(name.into_owned(), field_type));
  }

  Ok(TableHeader::new(columns, row_count))
}

/// 写出表头；调用方保证列数与行数已在上限内
pub(crate) fn encode_header(writer: &mut ByteWriter, columns: &[Column], row_count: usize) {
  // 上限远小于 i32::MAX
  writer.write_i32(columns.len() as i32);
  writer.write_i32(row_count as i32);
  for column in columns {
    writer.write_string(&column.name);
    writer.write_i32(column.field_type.tag());
  }
}
