//! 配置表记录目录
//!
//! 每种记录对应一个 `<TableName>.data` 文件，成员名与导出工具生成的列名一致。

mod audio;
mod avatar;
mod enums;
mod language;
mod sample;

pub use account_test::{AccountTestData, USERNAME_INDEX};
pub use audio::{AudioData, AUDIO_ID_INDEX};
pub use avatar::AvatarData;
pub use enums::{AudioGroupType, AudioIdType, SampleType};
pub use language::{LanguageData, LANG_CODE_INDEX};
pub use sample::SampleData;

use crate::registry::TableRegistry;

/// 注册目录中的全部表
pub fn register_catalog(registry: &mut TableRegistry) {
  registry.register::<SampleData>();
  registry.register::<AccountTestData>();
  registry.register::<LanguageData>();
  registry.register::<AudioData>();
  registry.register::<AvatarData>();
}
