//! 行解码
//!
//! - `decode_table`：按记录类型的绑定表把每一行解码为记录，构建 `Snapshot`
//! - `decode_rows`：不依赖记录类型，只输出表头与原始 `Row`
//!
//! 两者共享同一套单元格读取逻辑：每个单元格都按其编码宽度完整消费，
//! 即使对应列没有匹配的成员。

use core::fmt;

use cfgdata_domain::{coerce, ConversionError, MemberBinding, Record, Row, Snapshot, TableHeader, Value};
use serde::{Deserialize, Serialize};

use crate::header::decode_header;
use crate::reader::{ByteReader, ReadError};

/// 转换失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionPolicy {
  /// 整次加载失败
  #[default]
  Fail,
  /// 成员保持零值，记录一条 warn 日志后继续
  SkipField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
  pub conversion_policy: ConversionPolicy,
}

impl DecodeOptions {
  pub fn with_policy(conversion_policy: ConversionPolicy) -> Self {
    Self { conversion_policy }
  }
}

/// 出错位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  /// FieldCount / RowCount
  Header,
  /// 第 index 个列定义
  Column { index: usize },
  /// 行起始位置（没有列定义时）
  Row { row: usize },
  /// 数据单元格
  Cell { row: usize, column: usize, field: String },
}

impl Location {
  fn cell(row: usize, column: usize, field: &str) -> Self {
    Location::Cell { row, column, field: field.to_string() }
  }
}

/// 没有列定义时，每行开始前数据不得已读完
fn ensure_row_start(reader: &ByteReader<'_>, header: &TableHeader, row: usize) -> Result<()> {
  if header.field_count() == 0 && reader.is_at_end() {
    return Err(DecodeError::Truncated {
      location: Location::Row { row },
      source: ReadError::UnexpectedEof { offset: reader.position(), needed: 1, remaining: 0 },
    });
  }
  Ok(())
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Location::Header => f.write_str("header"),
      Location::Column { index } => write!(f, "column definition {index}"),
      Location::Row { row } => write!(f, "start of row {row}"),
      Location::Cell { row, column, field } => write!(f, "row {row}, column {column} ('{field}')"),
    }
  }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
  #[error("data too small for header: {len} bytes (need at least 8)")]
  HeaderTooSmall { len: usize },

  #[error("invalid field count: {0} (allowed 0..=1000)")]
  InvalidFieldCount(i32),

  #[error("invalid row count: {0} (allowed 0..=1000000)")]
  InvalidRowCount(i32),

  #[error("data is corrupted or incomplete at {location}: {source}")]
  Truncated {
    location: Location,
    #[source]
    source: ReadError,
  },

  #[error("row {row}, column {column} ('{field}'): cannot convert into member '{member}': {source}")]
  Conversion {
    row: usize,
    column: usize,
    field: String,
    member: &'static str,
    #[source]
    source: ConversionError,
  },
}

impl DecodeError {
  /// 数据本身损坏（表头过小、计数越界、提前结束）
  pub fn is_corrupt(&self) -> bool {
    !matches!(self, DecodeError::Conversion { .. })
  }
}

pub type Result<T> = std::result::Result<T, DecodeError>;

pub(crate) fn truncated(location: Location) -> impl FnOnce(ReadError) -> DecodeError {
  move |source| DecodeError::Truncated { location, source }
}

/// 把整个文件解码为记录快照
///
/// 列到成员的映射在读第一行之前一次性建立（忽略大小写，重复成员名取第一个）。
/// 没有匹配成员的列照常读取后丢弃；没有匹配列的成员保持 `Default`。
///
/// # Errors
///
/// - 表头过小 / 计数越界 / 数据提前结束：`is_corrupt() == true`
/// - `ConversionPolicy::Fail` 下的转换失败：`DecodeError::Conversion`
pub fn decode_table<R: Record>(bytes: &[u8], options: &DecodeOptions) -> Result<Snapshot<R>> {
  let mut reader = ByteReader::new(bytes);
  let header = decode_header(&mut reader)?;

  let schema = R::schema();
  let plan: Vec<Option<&MemberBinding<R>>> =
    header.columns.iter().map(|column| schema.member(&column.name)).collect();

  for (column, binding) in header.columns.iter().zip(&plan) {
    if binding.is_none() {
      tracing::debug!(table = R::TABLE_NAME, column = %column.name, "column has no matching member, ignoring");
    }
  }

  // 行数已做上限校验；真实数据量再用剩余字节数约束一次
  let mut records = Vec::with_capacity(header.row_count.min(reader.remaining()));
  let mut skipped = 0usize;

  for row in 0..header.row_count {
    ensure_row_start(&reader, &header, row)?;
    let mut record = R::default();

    for (column, (def, binding)) in header.columns.iter().zip(&plan).enumerate() {
      let value = reader
        .read_value(def.field_type)
        .map_err(|source| DecodeError::Truncated { location: Location::cell(row, column, &def.name), source })?;

      let Some(binding) = binding else { continue };

      match coerce(value, binding.kind()) {
        Ok(Some(converted)) => binding.set(&mut record, converted),
        Ok(None) => {}
        Err(source) => match options.conversion_policy {
          ConversionPolicy::Fail => {
            return Err(DecodeError::Conversion {
              row,
              column,
              field: def.name.clone(),
              member: binding.name(),
              source,
            });
          }
          ConversionPolicy::SkipField => {
            tracing::debug!(
              table = R::TABLE_NAME,
              row,
              column = %def.name,
              error = %source,
              "conversion failed, member left at default"
            );
            skipped += 1;
          }
        },
      }
    }

    records.push(record);
  }

  if skipped > 0 {
    tracing::warn!(table = R::TABLE_NAME, skipped, "some cells could not be converted and were skipped");
  }
  if !reader.is_at_end() {
    tracing::debug!(table = R::TABLE_NAME, trailing = reader.remaining(), "ignoring trailing bytes");
  }

  Ok(Snapshot::build(header, records))
}

/// 未绑定记录类型的解码结果
///
/// 字符串单元格尽量借用输入缓冲区。
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable<'a> {
  pub header: TableHeader,
  pub rows: Vec<Row<'a>>,
}

impl<'a> RawTable<'a> {
  /// 按列名（忽略大小写）取某一行的单元格
  pub fn cell(&self, row: usize, column_name: &str) -> Option<&Value<'a>> {
    self.rows.get(row).and_then(|r| r.get_by_name(column_name, &self.header))
  }
}

/// 只解码表头与原始行，用于检查工具
pub fn decode_rows(bytes: &[u8]) -> Result<RawTable<'_>> {
  let mut reader = ByteReader::new(bytes);
  let header = decode_header(&mut reader)?;

  let mut rows = Vec::with_capacity(header.row_count.min(reader.remaining()));
  for row in 0..header.row_count {
    ensure_row_start(&reader, &header, row)?;
    let mut values = Vec::with_capacity(header.field_count());
    for (column, def) in header.columns.iter().enumerate() {
      let value = reader
        .read_value(def.field_type)
        .map_err(|source| DecodeError::Truncated { location: Location::cell(row, column, &def.name), source })?;
      values.push(value);
    }
    rows.push(Row::new(values));
  }

  if !reader.is_at_end() {
    tracing::debug!(trailing = reader.remaining(), "ignoring trailing bytes");
  }

  Ok(RawTable { header, rows })
}
