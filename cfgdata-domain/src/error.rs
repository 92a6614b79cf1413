//! 领域错误类型
//!
//! 单元格值转换为记录成员类型时可能出现的错误

use thiserror::Error;

/// 类型转换错误
///
/// 解码出的值无法转换为目标成员类型。
/// 行/列上下文由解码层附加。
///
/// 线程安全: Send + Sync
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
  /// 两种类型之间没有转换规则
  #[error("cannot convert {from} to {to}")]
  Unsupported { from: &'static str, to: &'static str },

  /// 数值超出目标类型范围
  #[error("value {value} is out of range for {to}")]
  OutOfRange { value: String, to: &'static str },

  /// 字符串无法解析为目标类型
  #[error("cannot parse '{text}' as {to}")]
  Unparseable { text: String, to: &'static str },

  /// 名称或序号不属于该枚举
  #[error("'{value}' is not a member of enum {enum_name}")]
  UnknownEnumMember { value: String, enum_name: &'static str },
}
