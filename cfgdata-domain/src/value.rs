//! 值对象
//!
//! 定义从二进制表中解码出的单元格值:
//! - `Text`: UTF-8 字符串（使用 Cow 避免拷贝，可直接借用文件缓冲区）
//! - `Int32`: 32-bit 整数（Int32 与 Enum 列）
//! - `Int64`: 64-bit 整数
//! - `Float32`: 32-bit 浮点数
//! - `Bool`: 布尔
//! - `DateTime`: 日期时间（越界 tick 已替换为最小日期）

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::datetime::format_date_time;
use crate::field_type::FieldType;

/// 值对象：单元格值
///
/// 生命周期: 'v (可能引用文件缓冲区，避免拷贝)
/// 线程安全: Send + Sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value<'v> {
  /// UTF-8 字符串(使用 Cow 避免拷贝)
  Text(#[serde(borrow)] Cow<'v, str>),
  /// 32-bit 整数
  Int32(i32),
  /// 64-bit 整数
  Int64(i64),
  /// 32-bit 浮点数
  Float32(f32),
  /// 布尔
  Bool(bool),
  /// 日期时间
  DateTime(NaiveDateTime),
}

impl<'v> Value<'v> {
  /// 转换为所有权的值
  ///
  /// 将借用数据克隆为拥有数据，返回 `Value<'static>`。
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::Value;
  /// use std::borrow::Cow;
  ///
  /// let value = Value::Text(Cow::Borrowed("hello"));
  /// let owned = value.into_owned();
  ///
  pub fn into_owned(self) -> Value<'static> {
    match self {
      Value::Text(cow) => Value::Text(Cow::Owned(cow.into_owned())),
      Value::Int32(i) => Value::Int32(i),
      Value::Int64(i) => Value::Int64(i),
      Value::Float32(f) => Value::Float32(f),
      Value::Bool(b) => Value::Bool(b),
      Value::DateTime(dt) => Value::DateTime(dt),
    }
  }

  /// 值的自然列类型
  ///
  /// 注意：Enum 列解码为 `Int32`，因此这里永远不会返回 `FieldType::Enum`。
  pub fn field_type(&self) -> FieldType {
    match self {
      Value::Text(_) => FieldType::String,
      Value::Int32(_) => FieldType::Int32,
      Value::Int64(_) => FieldType::Int64,
      Value::Float32(_) => FieldType::Float32,
      Value::Bool(_) => FieldType::Bool,
      Value::DateTime(_) => FieldType::DateTime,
    }
  }

  /// 检查值能否按给定列类型编码
  ///
  /// Enum 列接受 `Int32`；未知标签列接受 `Text`。
  pub fn fits(&self, field_type: FieldType) -> bool {
    match (self, field_type) {
      (Value::Text(_), FieldType::String | FieldType::Unknown(_)) => true,
      (Value::Int32(_), FieldType::Int32 | FieldType::Enum) => true,
      (Value::Int64(_), FieldType::Int64) => true,
      (Value::Float32(_), FieldType::Float32) => true,
      (Value::Bool(_), FieldType::Bool) => true,
      (Value::DateTime(_), FieldType::DateTime) => true,
      _ => false,
    }
  }

  /// 值种类名（用于错误信息）
  pub fn kind_name(&self) -> &'static str {
    self.field_type().name()
  }

  pub fn as_i32(&self) -> Option<i32> {
    match self {
      Value::Int32(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Int64(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_f32(&self) -> Option<f32> {
    match self {
      Value::Float32(f) => Some(*f),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(b) => Some(*b),
      _ => None,
    }
  }

  /// 尝试转换为 &str
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::Value;
  /// use std::borrow::Cow;
  ///
  /// let value = Value::Text(Cow::Borrowed("hello"));
  /// assert_eq!(value.as_text(), Some("hello"));
  /// assert_eq!(Value::Int32(3).as_text(), None);
  ///
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Value::Text(s) => Some(s.as_ref()),
      _ => None,
    }
  }

  pub fn as_date_time(&self) -> Option<&NaiveDateTime> {
    match self {
      Value::DateTime(dt) => Some(dt),
      _ => None,
    }
  }
}

impl fmt::Display for Value<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Text(s) => write!(f, "{s:?}"),
      Value::Int32(i) => write!(f, "{i}"),
      Value::Int64(i) => write!(f, "{i}"),
      Value::Float32(v) => write!(f, "{v}"),
      Value::Bool(b) => write!(f, "{b}"),
      Value::DateTime(dt) => f.write_str(&format_date_time(dt)),
    }
  }
}
