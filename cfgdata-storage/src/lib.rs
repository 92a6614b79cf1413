//! cfgdata 存储层
//!
//! 二进制配置表的编解码：字节游标、表头、逐行解码为记录快照、写出器。

pub mod decoder;
pub mod header;
pub mod reader;
pub mod test_support;
pub mod writer;

pub use decoder::{
  decode_rows, decode_table, ConversionPolicy, DecodeError, DecodeOptions, Location, RawTable, Result,
};
pub use header::{decode_header, MAX_FIELD_COUNT, MAX_ROW_COUNT, MIN_HEADER_SIZE};
pub use reader::{ByteReader, ReadError};
pub use writer::{encode_records, ByteWriter, EncodeError, TableWriter};
