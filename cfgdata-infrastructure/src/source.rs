//! 字节来源
//!
//! 加载器只需要"按位置取回整个文件"这一种能力：
//! - 同步：`ByteSource`（本地文件）
//! - 异步：`AsyncByteSource`（tokio 文件、HTTP）
//!
//! location 是相对于来源根（目录或 base URL）的路径，例如 `"Sample.data"`。

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::file_io::{read_file, read_file_async};

/// 同步字节来源
///
/// 线程安全: Send + Sync
pub trait ByteSource: Send + Sync {
  fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// 异步字节来源
///
/// 返回的 future 必须是 Send，便于在多线程运行时中 spawn。
pub trait AsyncByteSource: Send + Sync {
  fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// 本地目录下的文件
#[derive(Debug, Clone, Default)]
pub struct FileSource {
  root: PathBuf,
}

impl FileSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn resolve(&self, location: &str) -> PathBuf {
    self.root.join(location)
  }
}

impl ByteSource for FileSource {
  fn fetch(&self, location: &str) -> Result<Vec<u8>> {
    read_file(self.resolve(location))
  }
}

/// 通过 tokio::fs 读取的本地目录
#[derive(Debug, Clone, Default)]
pub struct TokioFileSource {
  root: PathBuf,
}

impl TokioFileSource {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn resolve(&self, location: &str) -> PathBuf {
    self.root.join(location)
  }
}

impl AsyncByteSource for TokioFileSource {
  fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
    let path = self.resolve(location);
    async move { read_file_async(path).await }
  }
}

#[cfg(feature = "http")]
pub use http::HttpSource;

#[cfg(feature = "http")]
mod http {
  use std::future::Future;

  use super::AsyncByteSource;
  use crate::error::{Result, SourceError};

  /// 通过 HTTP GET 获取整个文件（`<base_url>/<location>`）
  ///
  /// - 404 映射为 `SourceError::NotFound`
  /// - 其它非 2xx 状态映射为 `SourceError::HttpStatus`
  #[derive(Debug, Clone)]
  pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
  }

  impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
      Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
      let base_url = base_url.into().trim_end_matches('/').to_string();
      Self { client, base_url }
    }

    pub fn url_for(&self, location: &str) -> String {
      format!("{}/{}", self.base_url, location.trim_start_matches('/'))
    }
  }

  impl AsyncByteSource for HttpSource {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>>> + Send {
      let url = self.url_for(location);
      let client = self.client.clone();
      async move {
        let response = client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
          return Err(SourceError::NotFound { location: url });
        }
        if !status.is_success() {
          return Err(SourceError::HttpStatus { location: url, status: status.as_u16() });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
      }
    }
  }

}
