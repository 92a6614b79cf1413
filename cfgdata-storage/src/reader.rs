use std::borrow::Cow;

use cfgdata_domain::datetime::{min_date_time, ticks_to_date_time};
use cfgdata_domain::{FieldType, Value};

/// 底层读取错误：数据提前结束或字符串长度前缀非法
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
  #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {remaining} remaining")]
  UnexpectedEof { offset: usize, needed: usize, remaining: usize },

  #[error("invalid 7-bit encoded string length at offset {offset}")]
  InvalidStringLength { offset: usize },
}

/// 7-bit 变长整数最多 5 字节
const MAX_7BIT_BYTES: usize = 5;

/// 小端序字节游标
///
/// - 只借用输入缓冲区，字符串以 `Cow::Borrowed` 返回（非法 UTF-8 时才拷贝并替换）
/// - 每个读取方法要么消费完整宽度，要么返回错误且不移动游标
pub struct ByteReader<'a> {
  buf: &'a [u8],
  pos: usize,
}

impl<'a> ByteReader<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    Self { buf, pos: 0 }
  }

  #[inline]
  pub fn position(&self) -> usize {
    self.pos
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.buf.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }

  #[inline]
  pub fn remaining(&self) -> usize {
    self.buf.len() - self.pos
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    self.pos >= self.buf.len()
  }

  fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
    if self.remaining() < n {
      return Err(ReadError::UnexpectedEof {
        offset: self.pos,
        needed: n,
        remaining: self.remaining(),
      });
    }
    let bytes = &self.buf[self.pos..self.pos + n];
    self.pos += n;
    Ok(bytes)
  }

  fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
    let mut out = [0u8; N];
    out.copy_from_slice(self.take(N)?);
    Ok(out)
  }

  pub fn read_u8(&mut self) -> Result<u8, ReadError> {
    Ok(self.take_array::<1>()?[0])
  }

  pub fn read_i32(&mut self) -> Result<i32, ReadError> {
    self.take_array().map(i32::from_le_bytes)
  }

  pub fn read_i64(&mut self) -> Result<i64, ReadError> {
    self.take_array().map(i64::from_le_bytes)
  }

  pub fn read_f32(&mut self) -> Result<f32, ReadError> {
    self.take_array().map(f32::from_le_bytes)
  }

  /// 1 字节，非 0 即 true
  pub fn read_bool(&mut self) -> Result<bool, ReadError> {
    Ok(self.read_u8()? != 0)
  }

  /// 7-bit 变长编码的长度前缀（每字节低 7 位为数据，最高位为续位）
  pub fn read_7bit_len(&mut self) -> Result<usize, ReadError> {
    let start = self.pos;
    let mut result: u32 = 0;

    for i in 0..MAX_7BIT_BYTES {
      let byte = match self.read_u8() {
        Ok(b) => b,
        Err(e) => {
          self.pos = start;
          return Err(e);
        }
      };
      // 第 5 字节只允许低 4 位
      if i == MAX_7BIT_BYTES - 1 && byte > 0x0F {
        self.pos = start;
        return Err(ReadError::InvalidStringLength { offset: start });
      }
      result |= u32::from(byte & 0x7F) << (7 * i);
      if byte & 0x80 == 0 {
        return i32::try_from(result)
          .ok()
          .and_then(|n| usize::try_from(n).ok())
          .ok_or_else(|| {
            self.pos = start;
            ReadError::InvalidStringLength { offset: start }
          });
      }
    }

    self.pos = start;
    Err(ReadError::InvalidStringLength { offset: start })
  }

  /// 长度前缀 UTF-8 字符串；非法 UTF-8 序列替换为 U+FFFD
  pub fn read_string(&mut self) -> Result<Cow<'a, str>, ReadError> {
    let start = self.pos;
    let len = self.read_7bit_len()?;
    match self.take(len) {
      Ok(bytes) => Ok(String::from_utf8_lossy(bytes)),
      Err(e) => {
        self.pos = start;
        Err(e)
      }
    }
  }

  /// 按列类型读取一个单元格
  ///
  /// - Enum 列读为 `Int32`
  /// - DateTime 越界 tick 替换为最小日期
  /// - 未知类型按字符串读取
  pub fn read_value(&mut self, field_type: FieldType) -> Result<Value<'a>, ReadError> {
    let value = match field_type {
      FieldType::String | FieldType::Unknown(_) => Value::Text(self.read_string()?),
      FieldType::Int32 | FieldType::Enum => Value::Int32(self.read_i32()?),
      FieldType::Int64 => Value::Int64(self.read_i64()?),
      FieldType::Float32 => Value::Float32(self.read_f32()?),
      FieldType::Bool => Value::Bool(self.read_bool()?),
      FieldType::DateTime => {
        let ticks = self.read_i64()?;
        Value::DateTime(ticks_to_date_time(ticks).unwrap_or_else(|| {
          tracing::trace!(ticks, "date time ticks out of range, substituting minimum date");
          min_date_time()
        }))
      }
    };
    Ok(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_little_endian_primitives() {
    let mut data = Vec::new();
    data.extend_from_slice(&7i32.to_le_bytes());
    data.extend_from_slice(&(-2i64).to_le_bytes());
    data.extend_from_slice(&1.5f32.to_le_bytes());
    data.push(2);

    let mut r = ByteReader::new(&data);
    assert_eq!(r.read_i32(), Ok(7));
    assert_eq!(r.read_i64(), Ok(-2));
    assert_eq!(r.read_f32(), Ok(1.5));
    assert_eq!(r.read_bool(), Ok(true));
    assert!(r.is_at_end());
  }

  #[test]
  fn short_read_does_not_move_cursor() {
    let data = [1u8, 2, 3];
    let mut r = ByteReader::new(&data);
    assert_eq!(r.read_i32(), Err(ReadError::UnexpectedEof { offset: 0, needed: 4, remaining: 3 }));
    assert_eq!(r.position(), 0);
  }

  #[test]
  fn seven_bit_length_prefix() {
    // 300 = 0b1_0010_1100 -> [0xAC, 0x02]
    let mut r = ByteReader::new(&[0xAC, 0x02]);
    assert_eq!(r.read_7bit_len(), Ok(300));

    let mut r = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(r.read_7bit_len(), Err(ReadError::InvalidStringLength { offset: 0 }));

    // 2^31 超出 i32 范围
    let mut r = ByteReader::new(&[0x80, 0x80, 0x80, 0x80, 0x08]);
    assert_eq!(r.read_7bit_len(), Err(ReadError::InvalidStringLength { offset: 0 }));
  }

  #[test]
  fn reads_strings_lossy() {
    let mut r = ByteReader::new(&[3, b'a', 0xFF, b'b']);
    assert_eq!(r.read_string().unwrap(), "a\u{FFFD}b");

    let mut r = ByteReader::new(&[5, b'a', b'b']);
    assert!(matches!(r.read_string(), Err(ReadError::UnexpectedEof { .. })));
    assert_eq!(r.position(), 0);
  }

  #[test]
  fn out_of_range_ticks_become_min_date() {
    let data = (-1i64).to_le_bytes();
    let mut r = ByteReader::new(&data);
    assert_eq!(r.read_value(FieldType::DateTime), Ok(Value::DateTime(min_date_time())));
  }

  #[test]
  fn unknown_tag_reads_string() {
    let mut r = ByteReader::new(&[2, b'h', b'i']);
    assert_eq!(r.read_value(FieldType::Unknown(77)), Ok(Value::Text(Cow::Borrowed("hi"))));
  }
}
