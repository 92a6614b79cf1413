#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// 测试结束时删除的临时目录
pub struct TempDir {
  path: PathBuf,
}

impl TempDir {
  pub fn new(prefix: &str) -> io::Result<Self> {
    let mut path = std::env::temp_dir();

    let nanos = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .unwrap_or_default()
      .as_nanos();

    path.push(format!("{prefix}_{}_{}", std::process::id(), nanos));
    std::fs::create_dir_all(&path)?;
    Ok(Self { path })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn write(&self, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    let path = self.path.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
  }
}

impl Drop for TempDir {
  fn drop(&mut self) {
    let _ = std::fs::remove_dir_all(&self.path);
  }
}
