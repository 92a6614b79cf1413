//! 配置表
//!
//! 一张表对应一种记录类型。加载在私有缓冲区中完成，成功后以 `Arc<Snapshot>`
//! 整体发布；读者克隆 `Arc` 后即可无锁访问，不会观察到加载到一半的状态。

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cfgdata_domain::{Record, RecordId, Records, Snapshot};
use cfgdata_infrastructure::{read_file, AsyncByteSource, ByteSource};
use cfgdata_storage::{decode_table, DecodeOptions};
use parking_lot::{Mutex, RwLock};

use crate::error::{Result, TableError};

type Listener<R> = Arc<dyn Fn(&Snapshot<R>) + Send + Sync>;

/// 强类型配置表
///
/// 状态机: Uninitialized --initialize 成功--> Initialized --reload 成功--> Initialized(新快照)
///
/// 不变量:
/// - 已发布的快照不可变
/// - initialize / reload 失败时保持原状态（未初始化或旧快照）
/// - 同一张表的 initialize / reload 串行执行
///
/// 生命周期: 'static（拥有全部快照）
/// 线程安全: Send + Sync，可通过 `Arc<ConfigTable<R>>` 共享
pub struct ConfigTable<R: Record> {
  current: RwLock<Option<Arc<Snapshot<R>>>>,
  load_guard: Mutex<()>,
  options: DecodeOptions,
  listeners: RwLock<Vec<Listener<R>>>,
}

impl<R: Record> Default for ConfigTable<R> {
  fn default() -> Self {
    Self::new()
  }
}

impl<R: Record> ConfigTable<R> {
  pub fn new() -> Self {
    Self::with_options(DecodeOptions::default())
  }

  pub fn with_options(options: DecodeOptions) -> Self {
    Self {
      current: RwLock::new(None),
      load_guard: Mutex::new(()),
      options,
      listeners: RwLock::new(Vec::new()),
    }
  }

  /// 表名（同时是数据文件的主文件名）
  #[inline]
  pub fn name(&self) -> &'static str {
    R::TABLE_NAME
  }

  pub fn options(&self) -> &DecodeOptions {
    &self.options
  }

  pub fn is_initialized(&self) -> bool {
    self.current.read().is_some()
  }

  /// 从本地文件加载表
  ///
  /// 已初始化时直接返回 `Ok(())`，不读取文件。
  ///
  /// # Arguments
  ///
  /// * `path` - 数据文件路径
  ///
  /// # Errors
  ///
  /// - `FileNotFound`：文件不存在
  /// - `CorruptData`：表头过小、计数越界、数据提前结束
  /// - `ConversionFailure`：单元格无法转换为成员类型
  ///
  /// # Examples
  ///
  /// use cfgdata_application::{ConfigTable, configs::SampleData};
  ///
  /// let table = ConfigTable::<SampleData>::new();
  /// table.initialize("ConfigData/Sample.data")?;
  /// let first = table.get_by_id(1)?;
  ///
  pub fn initialize(&self, path: impl AsRef<Path>) -> Result<()> {
    let snapshot = {
      let _guard = self.load_guard.lock();
      if self.is_initialized() {
        tracing::debug!(table = R::TABLE_NAME, "already initialized, skipping");
        return Ok(());
      }

      let bytes = read_file(path).map_err(|e| TableError::from_source(R::TABLE_NAME, e))?;
      self.publish(self.parse(&bytes)?)
    };
    self.notify(&snapshot);
    Ok(())
  }

  /// 从内存中的文件内容加载；已初始化时为空操作
  pub fn initialize_from_bytes(&self, bytes: &[u8]) -> Result<()> {
    let snapshot = {
      let _guard = self.load_guard.lock();
      if self.is_initialized() {
        tracing::debug!(table = R::TABLE_NAME, "already initialized, skipping");
        return Ok(());
      }
      self.publish(self.parse(bytes)?)
    };
    self.notify(&snapshot);
    Ok(())
  }

  /// 从同步字节来源加载；location 相对于来源根
  pub fn initialize_from<S: ByteSource + ?Sized>(&self, source: &S, location: &str) -> Result<()> {
    if self.is_initialized() {
      return Ok(());
    }
    let bytes = source.fetch(location).map_err(|e| TableError::from_source(R::TABLE_NAME, e))?;
    self.initialize_from_bytes(&bytes)
  }

  /// 异步加载：先等待整个文件取回，再同步解析
  ///
  /// 取回期间不持有任何锁；两个并发调用都会取回数据，但只有先完成的一个发布。
  pub async fn initialize_async<S: AsyncByteSource>(&self, source: &S, location: &str) -> Result<()> {
    if self.is_initialized() {
      tracing::debug!(table = R::TABLE_NAME, "already initialized, skipping");
      return Ok(());
    }

    let bytes = source
      .fetch(location)
      .await
      .map_err(|e| TableError::from_source(R::TABLE_NAME, e))?;
    self.initialize_from_bytes(&bytes)
  }

  /// 重新读取文件并原子替换快照
  ///
  /// 失败时已发布的快照保持不变；未初始化的表 reload 成功后即进入已初始化状态。
  pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
    let snapshot = {
      let _guard = self.load_guard.lock();
      let bytes = read_file(path).map_err(|e| TableError::from_source(R::TABLE_NAME, e))?;
      self.publish(self.parse(&bytes)?)
    };
    self.notify(&snapshot);
    Ok(())
  }

  pub fn reload_from_bytes(&self, bytes: &[u8]) -> Result<()> {
    let snapshot = {
      let _guard = self.load_guard.lock();
      self.publish(self.parse(bytes)?)
    };
    self.notify(&snapshot);
    Ok(())
  }

  pub async fn reload_async<S: AsyncByteSource>(&self, source: &S, location: &str) -> Result<()> {
    let bytes = source
      .fetch(location)
      .await
      .map_err(|e| TableError::from_source(R::TABLE_NAME, e))?;
    self.reload_from_bytes(&bytes)
  }

  /// 按主键查询；不存在时返回 `Ok(None)`
  ///
  /// # Errors
  ///
  /// 未初始化时返回 `NotInitialized`
  pub fn get_by_id(&self, id: impl Into<RecordId>) -> Result<Option<Arc<R>>> {
    Ok(self.snapshot()?.get_by_id(id).cloned())
  }

  /// 全部记录（文件顺序）的只读视图
  pub fn get_all(&self) -> Result<Records<R>> {
    Ok(Records::new(self.snapshot()?))
  }

  /// 记录数；未初始化时为 0
  pub fn count(&self) -> usize {
    self.current.read().as_ref().map_or(0, |s| s.len())
  }

  /// 当前快照
  pub fn snapshot(&self) -> Result<Arc<Snapshot<R>>> {
    self
      .current
      .read()
      .as_ref()
      .map(Arc::clone)
      .ok_or(TableError::NotInitialized { table: R::TABLE_NAME })
  }

  /// 二级索引查询（索引由 `Record::secondary_indexes` 声明）
  pub fn lookup(&self, index: &str, key: &str) -> Result<Option<Arc<R>>> {
    Ok(self.snapshot()?.lookup(index, key).cloned())
  }

  /// 注册加载完成回调；每次 initialize / reload 成功发布后调用一次
  ///
  /// 回调在发布线程上同步执行，执行时不持有表内任何锁：回调里可以查询、
  /// reload 或注册新回调（新回调从下一次加载开始生效）。
  pub fn on_loaded<F>(&self, listener: F)
  where
    F: Fn(&Snapshot<R>) + Send + Sync + 'static,
  {
    self.listeners.write().push(Arc::new(listener));
  }

  fn parse(&self, bytes: &[u8]) -> Result<Snapshot<R>> {
    decode_table::<R>(bytes, &self.options).map_err(|e| TableError::from_decode(R::TABLE_NAME, e))
  }

  /// 调用方须持有 `load_guard`
  fn publish(&self, snapshot: Snapshot<R>) -> Arc<Snapshot<R>> {
    let snapshot = Arc::new(snapshot);
    tracing::info!(
      table = R::TABLE_NAME,
      rows = snapshot.len(),
      indexed = snapshot.indexed_count(),
      "table loaded"
    );

    let previous = self.current.write().replace(Arc::clone(&snapshot));
    if previous.is_some() {
      tracing::debug!(table = R::TABLE_NAME, "replaced previous snapshot");
    }

    snapshot
  }

  /// 在锁外依次调用回调；先复制回调列表再释放读锁
  fn notify(&self, snapshot: &Snapshot<R>) {
    let listeners: Vec<Listener<R>> = self.listeners.read().iter().map(Arc::clone).collect();
    for listener in listeners {
      listener(snapshot);
    }
  }
}

impl<R: Record> fmt::Debug for ConfigTable<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConfigTable")
      .field("table", &R::TABLE_NAME)
      .field("initialized", &self.is_initialized())
      .field("count", &self.count())
      .finish()
  }
}
