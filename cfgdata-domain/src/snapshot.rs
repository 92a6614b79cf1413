//! 表快照
//!
//! 一次成功加载的完整结果：全部记录（文件顺序）+ 主键索引 + 二级索引。
//! 快照构建完成后不可变，通过 `Arc` 整体发布与替换。

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::ids::RecordId;
use crate::record::Record;
use crate::table::TableHeader;

/// 二级索引声明
///
/// `key` 返回 `None` 的记录不进入索引；键重复时后出现的记录覆盖先前的。
pub struct SecondaryIndex<R> {
  pub name: &'static str,
  pub key: fn(&R) -> Option<String>,
}

impl<R> SecondaryIndex<R> {
  pub fn new(name: &'static str, key: fn(&R) -> Option<String>) -> Self {
    Self { name, key }
  }
}

impl<R> fmt::Debug for SecondaryIndex<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SecondaryIndex").field("name", &self.name).finish()
  }
}

/// 表快照
///
/// 不变量:
/// - records 顺序等于文件中的行顺序
/// - by_id 只包含 id > 0 的记录，同 id 时后出现的行覆盖先前的
/// - 构建后不可变
///
/// 线程安全: Send + Sync（R: Record 保证）
pub struct Snapshot<R> {
  header: TableHeader,
  records: Vec<Arc<R>>,
  by_id: HashMap<RecordId, Arc<R>>,
  secondary: HashMap<&'static str, HashMap<String, Arc<R>>>,
}

impl<R: Record> Snapshot<R> {
  /// 由解码结果构建快照（主键索引 + 二级索引）
  pub fn build(header: TableHeader, records: Vec<R>) -> Self {
    let schema = R::schema();
    let records: Vec<Arc<R>> = records.into_iter().map(Arc::new).collect();

    let mut by_id = HashMap::with_capacity(records.len());
    for record in &records {
      if let Some(id) = schema.record_id(record) {
        if id.is_indexable() {
          by_id.insert(id, Arc::clone(record));
        }
      }
    }

    let mut secondary = HashMap::new();
    for index in R::secondary_indexes() {
      let mut map = HashMap::new();
      for record in &records {
        if let Some(key) = (index.key)(record) {
          map.insert(key, Arc::clone(record));
        }
      }
      secondary.insert(index.name, map);
    }

    Self { header, records, by_id, secondary }
  }

  /// 空快照（调用方在加载失败时可选择用它降级）
  pub fn empty() -> Self {
    Self::build(TableHeader::default(), Vec::new())
  }
}

impl<R> Snapshot<R> {
  /// 数据文件的表头
  #[inline]
  pub fn header(&self) -> &TableHeader {
    &self.header
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  #[inline]
  pub fn records(&self) -> &[Arc<R>] {
    &self.records
  }

  pub fn get_by_id(&self, id: impl Into<RecordId>) -> Option<&Arc<R>> {
    self.by_id.get(&id.into())
  }

  /// 主键索引中的记录数
  #[inline]
  pub fn indexed_count(&self) -> usize {
    self.by_id.len()
  }

  /// 二级索引查询；索引不存在时返回 `None`
  pub fn lookup(&self, index: &str, key: &str) -> Option<&Arc<R>> {
    self.secondary.get(index).and_then(|map| map.get(key))
  }
}

impl<R> fmt::Debug for Snapshot<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Snapshot")
      .field("columns", &self.header.columns.len())
      .field("records", &self.records.len())
      .field("indexed", &self.by_id.len())
      .finish()
  }
}

/// 全部记录的只读视图
///
/// 持有快照的 `Arc`，即使表随后被 reload，视图内容也不会变化。
pub struct Records<R> {
  snapshot: Arc<Snapshot<R>>,
}

impl<R> Records<R> {
  pub fn new(snapshot: Arc<Snapshot<R>>) -> Self {
    Self { snapshot }
  }

  /// 视图所属的快照
  pub fn snapshot(&self) -> &Arc<Snapshot<R>> {
    &self.snapshot
  }
}

impl<R> Clone for Records<R> {
  fn clone(&self) -> Self {
    Self { snapshot: Arc::clone(&self.snapshot) }
  }
}

impl<R> Deref for Records<R> {
  type Target = [Arc<R>];

  fn deref(&self) -> &Self::Target {
    self.snapshot.records()
  }
}

impl<'a, R> IntoIterator for &'a Records<R> {
  type Item = &'a Arc<R>;
  type IntoIter = std::slice::Iter<'a, Arc<R>>;

  fn into_iter(self) -> Self::IntoIter {
    self.snapshot.records().iter()
  }
}

impl<R: fmt::Debug> fmt::Debug for Records<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}
