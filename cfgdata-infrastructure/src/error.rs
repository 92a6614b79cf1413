use std::io;

/// 字节来源错误
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
  #[error("data file not found: {location}")]
  NotFound { location: String },

  #[error("io error reading {location}: {source}")]
  Io {
    location: String,
    #[source]
    source: io::Error,
  },

  #[error("http status {status} fetching {location}")]
  HttpStatus { location: String, status: u16 },

  #[cfg(feature = "http")]
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),
}

impl SourceError {
  pub(crate) fn from_io(location: impl Into<String>, source: io::Error) -> Self {
    let location = location.into();
    if source.kind() == io::ErrorKind::NotFound {
      SourceError::NotFound { location }
    } else {
      SourceError::Io { location, source }
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, SourceError::NotFound { .. })
  }
}

pub type Result<T> = std::result::Result<T, SourceError>;
