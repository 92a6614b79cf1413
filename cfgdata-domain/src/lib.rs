//! cfgdata 领域模型
//!
//! 二进制配置表的值对象、列/表头定义、记录绑定表、类型转换规则与不可变快照

pub mod coerce;
pub mod column;
pub mod datetime;
pub mod error;
pub mod field_type;
pub mod ids;
pub mod record;
pub mod row;
pub mod snapshot;
pub mod table;
pub mod value;

pub use coerce::coerce;
pub use column::Column;
pub use error::ConversionError;
pub use field_type::FieldType;
pub use ids::RecordId;
pub use record::{
  ConfigEnum, EnumDescriptor, MemberBinding, MemberKind, MemberValue, Record, RecordSchema,
  RecordSchemaBuilder,
};
pub use row::Row;
pub use snapshot::{Records, SecondaryIndex, Snapshot};
pub use table::TableHeader;
pub use value::Value;
