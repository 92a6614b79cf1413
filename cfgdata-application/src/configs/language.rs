use std::sync::{Arc, OnceLock};

use cfgdata_domain::{Record, RecordSchema, SecondaryIndex};

use crate::error::Result;
use crate::table::ConfigTable;

pub const LANG_CODE_INDEX: &str = "langcode";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LanguageData {
  pub id: i32,
  /// 例如 "en"、"zh-CN"
  pub lang_code: String,
  pub icon: String,
}

impl Record for LanguageData {
  const TABLE_NAME: &'static str = "Language";

  fn schema() -> &'static RecordSchema<Self> {
    static SCHEMA: OnceLock<RecordSchema<LanguageData>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
      RecordSchema::builder("LanguageData")
        .int32("Id", |r: &LanguageData| r.id, |r, v| r.id = v)
        .text("LangCode", |r: &LanguageData| r.lang_code.clone(), |r, v| r.lang_code = v)
        .text("Icon", |r: &LanguageData| r.icon.clone(), |r, v| r.icon = v)
        .build()
    })
  }

  fn secondary_indexes() -> Vec<SecondaryIndex<Self>> {
    vec![SecondaryIndex::new(LANG_CODE_INDEX, |r| Some(r.lang_code.clone()))]
  }
}

impl ConfigTable<LanguageData> {
  /// 按语言代码查询（区分大小写）
  pub fn get_by_lang_code(&self, lang_code: &str) -> Result<Option<Arc<LanguageData>>> {
    self.lookup(LANG_CODE_INDEX, lang_code)
  }
}
