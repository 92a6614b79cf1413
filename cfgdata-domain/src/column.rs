//! 列定义
//!
//! 文件头中声明的列：列名 + 类型标签

use crate::field_type::FieldType;

/// 列实体
///
/// 不变量:
/// - 列名按文件原样保存（大小写不变），与记录成员匹配时才忽略大小写
///
/// 生命周期: 'static
/// 线程安全: Send + Sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
  pub name: String,
  pub field_type: FieldType,
}

impl Column {
  /// 创建新列
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::{Column, FieldType};
  ///
  /// let column = Column::new("Id", FieldType::Int32);
  /// assert_eq!(column.name, "Id");
  ///
  pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
    Self { name: name.into(), field_type }
  }

  /// 列名是否与给定名称匹配（忽略大小写）
  pub fn matches_name(&self, name: &str) -> bool {
    names_match(&self.name, name)
  }
}

/// 忽略大小写的名称比较（列名与成员名匹配规则）
pub fn names_match(a: &str, b: &str) -> bool {
  a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
