//! 列类型标签
//!
//! 定义二进制表文件中每一列的类型标签（TypeTag），决定单元格的字节编码方式

use std::fmt;

/// 列类型标签值对象
///
/// 磁盘编码（i32，小端序）:
/// - `0`: String（7-bit 变长前缀的 UTF-8 字符串）
/// - `1`: Int32（4 字节）
/// - `2`: Int64（8 字节）
/// - `3`: Float32（4 字节）
/// - `4`: Bool（1 字节）
/// - `5`: DateTime（8 字节 tick 计数，1 tick = 100ns，起点 0001-01-01）
/// - `6`: Enum（4 字节，按 Int32 编码的枚举序号）
///
/// 未识别的标签保留原始值（`Unknown`），按 String 解码以保持向前兼容。
///
/// 生命周期: 'static
/// 线程安全: Send + Sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
  /// 字符串
  String,
  /// 32-bit 整数
  Int32,
  /// 64-bit 整数
  Int64,
  /// 32-bit 浮点
  Float32,
  /// 布尔
  Bool,
  /// 日期时间（tick 计数）
  DateTime,
  /// 枚举（Int32 序号）
  Enum,
  /// 未识别的标签，按 String 解码
  Unknown(i32),
}

impl FieldType {
  /// 从磁盘上的 i32 标签解析
  ///
  /// 永不失败：未知标签映射为 `Unknown(raw)`。
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::FieldType;
  ///
  /// assert_eq!(FieldType::from_tag(1), FieldType::Int32);
  /// assert_eq!(FieldType::from_tag(42), FieldType::Unknown(42));
  ///
  pub fn from_tag(tag: i32) -> Self {
    match tag {
      0 => Self::String,
      1 => Self::Int32,
      2 => Self::Int64,
      3 => Self::Float32,
      4 => Self::Bool,
      5 => Self::DateTime,
      6 => Self::Enum,
      other => Self::Unknown(other),
    }
  }

  /// 转换回磁盘标签
  pub fn tag(&self) -> i32 {
    match self {
      FieldType::String => 0,
      FieldType::Int32 => 1,
      FieldType::Int64 => 2,
      FieldType::Float32 => 3,
      FieldType::Bool => 4,
      FieldType::DateTime => 5,
      FieldType::Enum => 6,
      FieldType::Unknown(raw) => *raw,
    }
  }

  /// 是否为未识别标签
  #[inline]
  pub fn is_unknown(&self) -> bool {
    matches!(self, FieldType::Unknown(_))
  }

  /// 单元格的固定编码宽度（字节）
  ///
  /// 字符串类（`String` 与 `Unknown`）为变长，返回 `None`。
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::FieldType;
  ///
  /// assert_eq!(FieldType::Int64.fixed_width(), Some(8));
  /// assert_eq!(FieldType::String.fixed_width(), None);
  ///
  pub fn fixed_width(&self) -> Option<usize> {
    match self {
      FieldType::Int32 | FieldType::Float32 | FieldType::Enum => Some(4),
      FieldType::Int64 | FieldType::DateTime => Some(8),
      FieldType::Bool => Some(1),
      FieldType::String | FieldType::Unknown(_) => None,
    }
  }

  /// 类型名（用于日志与错误信息）
  pub fn name(&self) -> &'static str {
    match self {
      FieldType::String => "String",
      FieldType::Int32 => "Int32",
      FieldType::Int64 => "Int64",
      FieldType::Float32 => "Float32",
      FieldType::Bool => "Bool",
      FieldType::DateTime => "DateTime",
      FieldType::Enum => "Enum",
      FieldType::Unknown(_) => "Unknown",
    }
  }
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldType::Unknown(raw) => write!(f, "Unknown({raw})"),
      other => f.write_str(other.name()),
    }
  }
}
