use std::sync::{Arc, OnceLock};

use cfgdata_domain::{ConfigEnum, Record, RecordSchema, SecondaryIndex};

use super::{AudioGroupType, AudioIdType};
use crate::error::Result;
use crate::table::ConfigTable;

pub const AUDIO_ID_INDEX: &str = "audio_id";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AudioData {
  pub id: i32,
  pub audio_id: AudioIdType,
  pub group: AudioGroupType,
  pub asset_path: String,
  /// 0..=100
  pub default_volume: i32,
  pub looping: bool,
  pub priority: i32,
}

fn audio_key(audio_id: AudioIdType) -> String {
  audio_id.ordinal().to_string()
}

impl Record for AudioData {
  const TABLE_NAME: &'static str = "Audio";

  fn schema() -> &'static RecordSchema<Self> {
    static SCHEMA: OnceLock<RecordSchema<AudioData>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
      RecordSchema::builder("AudioData")
        .int32("Id", |r: &AudioData| r.id, |r, v| r.id = v)
        .enumeration("AudioId", |r: &AudioData| r.audio_id, |r, v| r.audio_id = v)
        .enumeration("Group", |r: &AudioData| r.group, |r, v| r.group = v)
        .text("AssetPath", |r: &AudioData| r.asset_path.clone(), |r, v| r.asset_path = v)
        .int32("DefaultVolume", |r: &AudioData| r.default_volume, |r, v| r.default_volume = v)
        .boolean("Loop", |r: &AudioData| r.looping, |r, v| r.looping = v)
        .int32("Priority", |r: &AudioData| r.priority, |r, v| r.priority = v)
        .build()
    })
  }

  fn secondary_indexes() -> Vec<SecondaryIndex<Self>> {
    vec![SecondaryIndex::new(AUDIO_ID_INDEX, |r| Some(audio_key(r.audio_id)))]
  }
}

impl ConfigTable<AudioData> {
  pub fn get_by_audio_id(&self, audio_id: AudioIdType) -> Result<Option<Arc<AudioData>>> {
    self.lookup(AUDIO_ID_INDEX, &audio_key(audio_id))
  }

  /// 属于某个分组的全部音频（文件顺序）
  pub fn get_by_group(&self, group: AudioGroupType) -> Result<Vec<Arc<AudioData>>> {
    Ok(self.get_all()?.iter().filter(|a| a.group == group).cloned().collect())
  }
}
