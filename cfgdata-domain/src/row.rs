//! 行数据
//!
//! 未绑定记录类型时的原始行：按列顺序保存解码后的值

use crate::table::TableHeader;
use crate::value::Value;

/// 行实体
///
/// 不变量：
/// - values 长度等于表头列数（验证在解码层进行）
///
/// 生命周期: 'r (字符串可能借用文件缓冲区)
/// 线程安全: Send + Sync
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'r> {
  pub values: Vec<Value<'r>>,
}

impl<'r> Row<'r> {
  pub fn new(values: Vec<Value<'r>>) -> Self {
    Self { values }
  }

  /// 获取列值（按索引）
  ///
  /// 返回指定索引位置的值的引用，如果索引超出范围则返回 `None`。
  pub fn get(&self, index: usize) -> Option<&Value<'r>> {
    self.values.get(index)
  }

  /// 获取列值（按列名，忽略大小写）
  ///
  /// 根据列名从表头中查找对应的列，然后返回该列的值。
  ///
  /// # Examples
  ///
  /// use cfgdata_domain::{Column, FieldType, Row, TableHeader, Value};
  /// use std::borrow::Cow;
  ///
  /// let header = TableHeader::new(
  ///   vec![Column::new("Id", FieldType::Int32), Column::new("Name", FieldType::String)],
  ///   1,
  /// );
  /// let row = Row::new(vec![Value::Int32(1), Value::Text(Cow::Borrowed("Alice"))]);
  ///
  /// assert_eq!(row.get_by_name("name", &header), Some(&Value::Text(Cow::Borrowed("Alice"))));
  /// assert_eq!(row.get_by_name("nonexistent", &header), None);
  pub fn get_by_name(&self, column_name: &str, header: &TableHeader) -> Option<&Value<'r>> {
    header.column_index(column_name).and_then(|index| self.get(index))
  }

  /// 转换为所有权的行
  pub fn into_owned(self) -> Row<'static> {
    Row { values: self.values.into_iter().map(Value::into_owned).collect() }
  }
}
