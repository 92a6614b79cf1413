//! 表头定义
//!
//! 二进制表文件自带的模式：列定义（按声明顺序）与行数

use crate::column::Column;

/// 表头实体
///
/// 不变量:
/// - columns 顺序即每行单元格的解码顺序
/// - columns.len() <= 1000, row_count <= 1_000_000（解码时校验）
///
/// 生命周期: 'static
/// 线程安全: Send + Sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableHeader {
  pub columns: Vec<Column>,
  pub row_count: usize,
}

impl TableHeader {
  pub fn new(columns: Vec<Column>, row_count: usize) -> Self {
    Self { columns, row_count }
  }

  #[inline]
  pub fn field_count(&self) -> usize {
    self.columns.len()
  }

  /// 查找列（按名称，忽略大小写）
  ///
  /// 返回第一个匹配名称的列的引用
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::{Column, FieldType, TableHeader};
  ///
  /// let header = TableHeader::new(vec![Column::new("Id", FieldType::Int32)], 0);
  ///
  /// assert!(header.get_column("id").is_some());
  /// assert!(header.get_column("nonexistent").is_none());
  pub fn get_column(&self, name: &str) -> Option<&Column> {
    self.columns.iter().find(|col| col.matches_name(name))
  }

  /// 查找列下标（按名称，忽略大小写）
  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|col| col.matches_name(name))
  }

  /// 类型标签未识别、按字符串解码的列
  pub fn unknown_columns(&self) -> impl Iterator<Item = &Column> {
    self.columns.iter().filter(|col| col.field_type.is_unknown())
  }
}
