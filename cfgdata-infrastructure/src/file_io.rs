use std::fs;
use std::path::Path;

use crate::error::{Result, SourceError};

/// 一次性读取整个文件；文件不存在映射为 `SourceError::NotFound`
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<u8>> {
  let path = path.as_ref();
  fs::read(path).map_err(|e| SourceError::from_io(path.display().to_string(), e))
}

/// `read_file` 的 tokio 版本
pub async fn read_file_async(path: impl AsRef<Path>) -> Result<Vec<u8>> {
  let path = path.as_ref();
  tokio::fs::read(path)
    .await
    .map_err(|e| SourceError::from_io(path.display().to_string(), e))
}

/// 获取文件长度（字节数）
pub fn file_len(path: impl AsRef<Path>) -> Result<u64> {
  let path = path.as_ref();
  fs::metadata(path)
    .map(|m| m.len())
    .map_err(|e| SourceError::from_io(path.display().to_string(), e))
}
