//! 加载器配置
//!
//! JSON 示例:
//!
//! {
//!   "data_dir": "StreamingAssets/ConfigData",
//!   "file_extension": "data",
//!   "conversion_policy": "skip_field",
//!   "fail_fast": false
//! }
//!
//! 所有字段都可省略，省略时取默认值。

use std::path::{Path, PathBuf};

use cfgdata_storage::{ConversionPolicy, DecodeOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DATA_DIR: &str = "ConfigData";
pub const DEFAULT_FILE_EXTENSION: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
  /// 数据文件所在目录
  pub data_dir: PathBuf,
  /// 数据文件扩展名（不含点）
  pub file_extension: String,
  /// 单元格转换失败时的处理方式
  pub conversion_policy: ConversionPolicy,
  /// `initialize_all` 遇到第一个失败的表时立即返回
  pub fail_fast: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self {
      data_dir: PathBuf::from(DEFAULT_DATA_DIR),
      file_extension: DEFAULT_FILE_EXTENSION.to_string(),
      conversion_policy: ConversionPolicy::Fail,
      fail_fast: false,
    }
  }
}

impl LoaderConfig {
  pub fn new(data_dir: impl Into<PathBuf>) -> Self {
    Self { data_dir: data_dir.into(), ..Self::default() }
  }

  pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
    let config: LoaderConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Io { path: path.display().to_string(), source })?;
    Self::from_json_str(&json)
  }

  pub fn to_json_string(&self) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let ext = self.file_extension.as_str();
    if ext.trim().is_empty() {
      return Err(ConfigError::Invalid("file_extension must not be empty".to_string()));
    }
    if ext.trim() != ext {
      return Err(ConfigError::Invalid(format!(
        "file_extension must not have surrounding whitespace: {ext:?}"
      )));
    }
    if ext.starts_with('.') {
      return Err(ConfigError::Invalid(format!(
        "file_extension must not start with '.': {ext}"
      )));
    }
    if ext.contains(|c: char| c == '/' || c == '\\') {
      return Err(ConfigError::Invalid(format!("file_extension must not contain path separators: {ext}")));
    }
    Ok(())
  }

  /// 表的相对位置：`<TableName>.<ext>`
  pub fn table_location(&self, table: &str) -> String {
    format!("{table}.{}", self.file_extension)
  }

  /// 表的本地路径：`<data_dir>/<TableName>.<ext>`
  pub fn table_path(&self, table: &str) -> PathBuf {
    self.data_dir.join(self.table_location(table))
  }

  pub fn decode_options(&self) -> DecodeOptions {
    DecodeOptions::with_policy(self.conversion_policy)
  }

  pub fn with_conversion_policy(mut self, policy: ConversionPolicy) -> Self {
    self.conversion_policy = policy;
    self
  }

  pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
    self.fail_fast = fail_fast;
    self
  }
}
