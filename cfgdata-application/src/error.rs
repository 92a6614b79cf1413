//! 应用层错误类型
//!
//! 把存储层 / 基础设施层的错误归并为调用方可区分的几类，并附带表名。

use std::io;

use cfgdata_domain::ConversionError;
use cfgdata_infrastructure::SourceError;
use cfgdata_storage::DecodeError;
use thiserror::Error;

/// 表操作错误
///
/// 线程安全: Send + Sync
#[derive(Error, Debug)]
pub enum TableError {
  /// 在第一次成功加载之前查询
  #[error("table {table} is not initialized")]
  NotInitialized { table: &'static str },

  /// 数据文件不存在
  #[error("data file for table {table} not found: {location}")]
  FileNotFound { table: &'static str, location: String },

  /// 表头过小、计数越界或数据提前结束
  #[error("corrupt data in table {table}: {source}")]
  CorruptData {
    table: &'static str,
    #[source]
    source: DecodeError,
  },

  /// 单元格无法转换为成员类型
  #[error("table {table}: row {row}, column {column} ('{field}'): {source}")]
  ConversionFailure {
    table: &'static str,
    row: usize,
    column: usize,
    field: String,
    #[source]
    source: ConversionError,
  },

  /// 读取数据失败（文件不存在以外的 I/O / 网络错误）
  #[error("failed to read data for table {table}: {source}")]
  Source {
    table: &'static str,
    #[source]
    source: SourceError,
  },
}

impl TableError {
  pub(crate) fn from_decode(table: &'static str, err: DecodeError) -> Self {
    match err {
      DecodeError::Conversion { row, column, field, source, .. } => {
        TableError::ConversionFailure { table, row, column, field, source }
      }
      other => TableError::CorruptData { table, source: other },
    }
  }

  pub(crate) fn from_source(table: &'static str, err: SourceError) -> Self {
    match err {
      SourceError::NotFound { location } => TableError::FileNotFound { table, location },
      other => TableError::Source { table, source: other },
    }
  }

  /// 出错的表名
  pub fn table(&self) -> &'static str {
    match self {
      TableError::NotInitialized { table }
      | TableError::FileNotFound { table, .. }
      | TableError::CorruptData { table, .. }
      | TableError::ConversionFailure { table, .. }
      | TableError::Source { table, .. } => *table,
    }
  }

  pub fn is_not_initialized(&self) -> bool {
    matches!(self, TableError::NotInitialized { .. })
  }

  pub fn is_file_not_found(&self) -> bool {
    matches!(self, TableError::FileNotFound { .. })
  }

  pub fn is_corrupt_data(&self) -> bool {
    matches!(self, TableError::CorruptData { .. })
  }

  pub fn is_conversion_failure(&self) -> bool {
    matches!(self, TableError::ConversionFailure { .. })
  }
}

pub type Result<T> = std::result::Result<T, TableError>;

/// 加载器配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("invalid config json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("invalid config: {0}")]
  Invalid(String),
}
