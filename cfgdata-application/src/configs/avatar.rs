use std::sync::OnceLock;

use cfgdata_domain::{Record, RecordSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AvatarData {
  pub id: i32,
  pub asset: String,
}

impl Record for AvatarData {
  const TABLE_NAME: &'static str = "Avatar";

  fn schema() -> &'static RecordSchema<Self> {
    static SCHEMA: OnceLock<RecordSchema<AvatarData>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
      RecordSchema::builder("AvatarData")
        .int32("id", |r: &AvatarData| r.id, |r, v| r.id = v)
        .text("asset", |r: &AvatarData| r.asset.clone(), |r, v| r.asset = v)
        .build()
    })
  }
}
