//! cfgdata 应用层
//!
//! 强类型配置表（初始化 / 查询 / 重载）、表注册中心、加载器配置与记录目录。

pub mod config;
pub mod configs;
pub mod error;
pub mod registry;
pub mod table;

pub use cfgdata_domain::{Record, RecordId, Records, Snapshot};
pub use cfgdata_storage::ConversionPolicy;
pub use config::LoaderConfig;
pub use error::{ConfigError, Result, TableError};
pub use registry::{LoadReport, ManagedTable, TableRegistry};
pub use table::ConfigTable;
