//! cfgdata 基础设施层
//!
//! 数据文件的字节提供者：本地文件读取、同步/异步来源抽象、HTTP 来源（feature `http`）。

pub mod error;
pub mod file_io;
pub mod source;

pub use error::{Result, SourceError};
pub use file_io::{file_len, read_file, read_file_async};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{AsyncByteSource, ByteSource, FileSource, TokioFileSource};
