//! 表注册中心
//!
//! 持有每种记录类型的一张表，按 `<data_dir>/<TableName>.<ext>` 解析数据文件路径，
//! 一次性初始化 / 重载全部表。单表失败只记录并汇报，其余表照常加载
//! （`fail_fast` 时遇到第一个失败立即返回）。

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use cfgdata_domain::Record;
use cfgdata_infrastructure::AsyncByteSource;

use crate::config::LoaderConfig;
use crate::error::{Result, TableError};
use crate::table::ConfigTable;

/// 注册中心对表的类型擦除视图
pub trait ManagedTable: Send + Sync {
  fn name(&self) -> &'static str;
  fn is_initialized(&self) -> bool;
  fn count(&self) -> usize;
  fn initialize_path(&self, path: &Path) -> Result<()>;
  fn initialize_bytes(&self, bytes: &[u8]) -> Result<()>;
  fn reload_path(&self, path: &Path) -> Result<()>;
}

impl<R: Record> ManagedTable for ConfigTable<R> {
  fn name(&self) -> &'static str {
    ConfigTable::name(self)
  }

  fn is_initialized(&self) -> bool {
    ConfigTable::is_initialized(self)
  }

  fn count(&self) -> usize {
    ConfigTable::count(self)
  }

  fn initialize_path(&self, path: &Path) -> Result<()> {
    self.initialize(path)
  }

  fn initialize_bytes(&self, bytes: &[u8]) -> Result<()> {
    self.initialize_from_bytes(bytes)
  }

  fn reload_path(&self, path: &Path) -> Result<()> {
    self.reload(path)
  }
}

/// 一次批量加载的结果
#[derive(Debug, Default)]
pub struct LoadReport {
  /// 本次成功加载的表
  pub loaded: Vec<&'static str>,
  /// 已初始化、本次跳过的表
  pub skipped: Vec<&'static str>,
  /// 失败的表及原因
  pub failed: Vec<TableError>,
}

impl LoadReport {
  pub fn is_success(&self) -> bool {
    self.failed.is_empty()
  }

  pub fn failed_tables(&self) -> Vec<&'static str> {
    self.failed.iter().map(TableError::table).collect()
  }
}

struct Entry {
  table: Arc<dyn ManagedTable>,
  typed: Arc<dyn Any + Send + Sync>,
}

/// 表注册中心
///
/// 表按注册顺序加载。
///
/// 线程安全: 注册需要 `&mut self`；注册完成后可通过 `Arc<TableRegistry>` 共享
pub struct TableRegistry {
  config: LoaderConfig,
  entries: Vec<Entry>,
  by_type: HashMap<TypeId, usize>,
}

impl TableRegistry {
  pub fn new(config: LoaderConfig) -> Self {
    Self { config, entries: Vec::new(), by_type: HashMap::new() }
  }

  pub fn config(&self) -> &LoaderConfig {
    &self.config
  }

  /// 注册记录类型 R 的表；重复注册返回已有的表
  pub fn register<R: Record>(&mut self) -> Arc<ConfigTable<R>> {
    if let Some(existing) = self.table::<R>() {
      return existing;
    }

    let table = Arc::new(ConfigTable::<R>::with_options(self.config.decode_options()));
    self.by_type.insert(TypeId::of::<R>(), self.entries.len());
    self.entries.push(Entry {
      table: Arc::clone(&table) as Arc<dyn ManagedTable>,
      typed: Arc::clone(&table) as Arc<dyn Any + Send + Sync>,
    });
    table
  }

  /// 取出记录类型 R 的表；未注册时返回 `None`
  pub fn table<R: Record>(&self) -> Option<Arc<ConfigTable<R>>> {
    let index = *self.by_type.get(&TypeId::of::<R>())?;
    let typed = Arc::clone(&self.entries.get(index)?.typed);
    typed.downcast::<ConfigTable<R>>().ok()
  }

  /// 按表名查找（区分大小写）
  pub fn table_by_name(&self, name: &str) -> Option<Arc<dyn ManagedTable>> {
    self.entries.iter().find(|e| e.table.name() == name).map(|e| Arc::clone(&e.table))
  }

  pub fn table_names(&self) -> Vec<&'static str> {
    self.entries.iter().map(|e| e.table.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// 全部表都已初始化
  pub fn is_initialized(&self) -> bool {
    self.entries.iter().all(|e| e.table.is_initialized())
  }

  /// 初始化所有尚未初始化的表
  ///
  /// # Errors
  ///
  /// 只有 `fail_fast` 时才会返回错误；否则失败记录在 `LoadReport::failed` 中
  pub fn initialize_all(&self) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for entry in &self.entries {
      let table = &entry.table;
      if table.is_initialized() {
        report.skipped.push(table.name());
        continue;
      }

      let path = self.config.table_path(table.name());
      let outcome = table.initialize_path(&path);
      self.record(&mut report, table.name(), outcome)?;
    }

    self.log_summary("initialize_all", &report);
    Ok(report)
  }

  /// `initialize_all` 的异步版本；location 为 `<TableName>.<ext>`，相对于来源根
  pub async fn initialize_all_async<S: AsyncByteSource>(&self, source: &S) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for entry in &self.entries {
      let table = &entry.table;
      if table.is_initialized() {
        report.skipped.push(table.name());
        continue;
      }

      let location = self.config.table_location(table.name());
      let outcome = match source.fetch(&location).await {
        Ok(bytes) => table.initialize_bytes(&bytes),
        Err(e) => Err(TableError::from_source(table.name(), e)),
      };
      self.record(&mut report, table.name(), outcome)?;
    }

    self.log_summary("initialize_all_async", &report);
    Ok(report)
  }

  /// 重载所有表；失败的表保留旧快照
  pub fn reload_all(&self) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for entry in &self.entries {
      let table = &entry.table;
      let path = self.config.table_path(table.name());
      let outcome = table.reload_path(&path);
      self.record(&mut report, table.name(), outcome)?;
    }

    self.log_summary("reload_all", &report);
    Ok(report)
  }

  fn record(&self, report: &mut LoadReport, name: &'static str, outcome: Result<()>) -> Result<()> {
    match outcome {
      Ok(()) => report.loaded.push(name),
      Err(e) if self.config.fail_fast => return Err(e),
      Err(e) => {
        tracing::warn!(table = name, error = %e, "failed to load table");
        report.failed.push(e);
      }
    }
    Ok(())
  }

  fn log_summary(&self, operation: &'static str, report: &LoadReport) {
    tracing::info!(
      operation,
      loaded = report.loaded.len(),
      skipped = report.skipped.len(),
      failed = report.failed.len(),
      "config tables processed"
    );
  }
}

impl fmt::Debug for TableRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TableRegistry")
      .field("config", &self.config)
      .field("tables", &self.table_names())
      .finish()
  }
}
