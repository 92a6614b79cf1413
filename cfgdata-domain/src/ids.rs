//! ID 类型定义（newtype 模式）
//!
//! 使用 newtype 模式提供类型安全的记录 ID，避免与行号、列号混淆。

/// 记录 ID
///
/// 主键索引的键，来自记录中名为 "id"（忽略大小写）的成员。
/// 只有 > 0 的 ID 会进入索引。
/// 底层类型：`i32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(i32);

impl RecordId {
  #[inline]
  pub fn new(id: i32) -> Self {
    Self(id)
  }

  #[inline]
  pub fn into_inner(self) -> i32 {
    self.0
  }

  /// 是否可以进入主键索引（id > 0）
  #[inline]
  pub fn is_indexable(self) -> bool {
    self.0 > 0
  }
}

impl From<i32> for RecordId {
  #[inline]
  fn from(id: i32) -> Self {
    Self(id)
  }
}

impl From<RecordId> for i32 {
  #[inline]
  fn from(id: RecordId) -> Self {
    id.0
  }
}
