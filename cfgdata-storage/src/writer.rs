//! 二进制表写出
//!
//! 与解码器互逆的编码器：导出工具用它生成数据文件，测试用它构造输入。

use cfgdata_domain::datetime::{date_time_to_ticks, format_date_time};
use cfgdata_domain::{Column, FieldType, Record, Row, Value};

use crate::header::{encode_header, MAX_FIELD_COUNT, MAX_ROW_COUNT};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
  #[error("too many columns: {0} (max 1000)")]
  TooManyColumns(usize),

  #[error("too many rows: {0} (max 1000000)")]
  TooManyRows(usize),

  #[error("row {row} has {got} values, expected {expected}")]
  RowLength { row: usize, expected: usize, got: usize },

  #[error("row {row}, column {column} ('{field}'): {got} value does not fit column type {expected}")]
  TypeMismatch { row: usize, column: usize, field: String, expected: FieldType, got: &'static str },

  #[error("row {row}, column {column} ('{field}'): date {value} is outside 0001-01-01..=9999-12-31")]
  DateOutOfRange { row: usize, column: usize, field: String, value: String },
}

/// 小端序字节写出器
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
  buf: Vec<u8>,
}

impl ByteWriter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self { buf: Vec::with_capacity(capacity) }
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.buf.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  pub fn write_u8(&mut self, v: u8) {
    self.buf.push(v);
  }

  pub fn write_i32(&mut self, v: i32) {
    self.buf.extend_from_slice(&v.to_le_bytes());
  }

  pub fn write_i64(&mut self, v: i64) {
    self.buf.extend_from_slice(&v.to_le_bytes());
  }

  pub fn write_f32(&mut self, v: f32) {
    self.buf.extend_from_slice(&v.to_le_bytes());
  }

  pub fn write_bool(&mut self, v: bool) {
    self.buf.push(u8::from(v));
  }

  /// 7-bit 变长长度前缀
  pub fn write_7bit_len(&mut self, len: usize) {
    let mut n = len;
    while n >= 0x80 {
      self.buf.push((n as u8 & 0x7F) | 0x80);
      n >>= 7;
    }
    self.buf.push(n as u8);
  }

  pub fn write_string(&mut self, s: &str) {
    self.write_7bit_len(s.len());
    self.buf.extend_from_slice(s.as_bytes());
  }

  pub fn write_bytes(&mut self, bytes: &[u8]) {
    self.buf.extend_from_slice(bytes);
  }

  /// 写一个单元格；调用方保证 `value.fits(field_type)`
  pub(crate) fn write_value(&mut self, value: &Value<'_>) {
    match value {
      Value::Text(s) => self.write_string(s),
      Value::Int32(i) => self.write_i32(*i),
      Value::Int64(i) => self.write_i64(*i),
      Value::Float32(f) => self.write_f32(*f),
      Value::Bool(b) => self.write_bool(*b),
      // push_row 已校验范围
      Value::DateTime(dt) => self.write_i64(date_time_to_ticks(dt).unwrap_or_default()),
    }
  }

  pub fn into_inner(self) -> Vec<u8> {
    self.buf
  }
}

/// 按列定义逐行写出的表编码器
///
/// # Examples
///
/// use cfgdata_domain::{Column, FieldType, Value};
/// use cfgdata_storage::TableWriter;
///
/// let mut w = TableWriter::new(vec![Column::new("ID", FieldType::Int32)])?;
/// w.push_row(vec![Value::Int32(1)])?;
/// let bytes = w.finish();
///
#[derive(Debug, Clone)]
pub struct TableWriter {
  columns: Vec<Column>,
  rows: Vec<Row<'static>>,
}

impl TableWriter {
  pub fn new(columns: Vec<Column>) -> Result<Self, EncodeError> {
    if columns.len() > MAX_FIELD_COUNT as usize {
      return Err(EncodeError::TooManyColumns(columns.len()));
    }
    Ok(Self { columns, rows: Vec::new() })
  }

  pub fn columns(&self) -> &[Column] {
    &self.columns
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  /// 追加一行；值的个数与类型必须与列定义一致（Enum 列接受 Int32，未知列接受 Text）
  pub fn push_row(&mut self, values: Vec<Value<'_>>) -> Result<(), EncodeError> {
    let row = self.rows.len();
    if row >= MAX_ROW_COUNT as usize {
      return Err(EncodeError::TooManyRows(row + 1));
    }
    if values.len() != self.columns.len() {
      return Err(EncodeError::RowLength { row, expected: self.columns.len(), got: values.len() });
    }

    for (column, (value, def)) in values.iter().zip(&self.columns).enumerate() {
      if !value.fits(def.field_type) {
        return Err(EncodeError::TypeMismatch {
          row,
          column,
          field: def.name.clone(),
          expected: def.field_type,
          got: value.kind_name(),
        });
      }
      if let Value::DateTime(dt) = value {
        if date_time_to_ticks(dt).is_none() {
          return Err(EncodeError::DateOutOfRange {
            row,
            column,
            field: def.name.clone(),
            value: format_date_time(dt),
          });
        }
      }
    }

    self.rows.push(Row::new(values.into_iter().map(Value::into_owned).collect()));
    Ok(())
  }

  /// 输出完整文件内容
  pub fn finish(&self) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    encode_header(&mut writer, &self.columns, self.rows.len());
    for row in &self.rows {
      for value in &row.values {
        writer.write_value(value);
      }
    }
    writer.into_inner()
  }
}

/// 以记录类型的绑定表为列定义，把记录写成数据文件
///
/// 列名与成员名一致，列类型取成员种类对应的类型（枚举写为 Enum/Int32）。
pub fn encode_records<R: Record>(records: &[R]) -> Result<Vec<u8>, EncodeError> {
  let schema = R::schema();
  let columns = schema
    .members()
    .iter()
    .map(|member| Column::new(member.name(), member.kind().field_type()))
    .collect();

  let mut writer = TableWriter::new(columns)?;
  for record in records {
    let values = schema.members().iter().map(|member| member.get(record).into_value()).collect();
    writer.push_row(values)?;
  }
  Ok(writer.finish())
}
