use std::sync::OnceLock;

use cfgdata_domain::{Record, RecordSchema};
use chrono::NaiveDateTime;

use super::SampleType;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SampleData {
  pub id: i32,
  pub name: String,
  pub sample_type: SampleType,
  pub level: i32,
  pub cost: f32,
  pub open_time: NaiveDateTime,
  pub close_time: NaiveDateTime,
}

impl SampleData {
  /// `at` 落在 [open_time, close_time) 内
  pub fn is_open_at(&self, at: &NaiveDateTime) -> bool {
    self.open_time <= *at && *at < self.close_time
  }
}

impl Record for SampleData {
  const TABLE_NAME: &'static str = "Sample";

  fn schema() -> &'static RecordSchema<Self> {
    static SCHEMA: OnceLock<RecordSchema<SampleData>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
      RecordSchema::builder("SampleData")
        .int32("ID", |r: &SampleData| r.id, |r, v| r.id = v)
        .text("Name", |r: &SampleData| r.name.clone(), |r, v| r.name = v)
        .enumeration("Type", |r: &SampleData| r.sample_type, |r, v| r.sample_type = v)
        .int32("Level", |r: &SampleData| r.level, |r, v| r.level = v)
        .float32("Cost", |r: &SampleData| r.cost, |r, v| r.cost = v)
        .date_time("OpenTime", |r: &SampleData| r.open_time, |r, v| r.open_time = v)
        .date_time("CloseTime", |r: &SampleData| r.close_time, |r, v| r.close_time = v)
        .build()
    })
  }
}
