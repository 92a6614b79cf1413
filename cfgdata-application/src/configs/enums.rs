//! 配置枚举

cfgdata_domain::config_enum! {
  #[derive(Default)]
  pub enum SampleType {
    #[default]
    None = 0,
    Weapon = 1,
    Armor = 2,
    Consumable = 3,
  }
}

cfgdata_domain::config_enum! {
  #[derive(Default)]
  pub enum AudioIdType {
    #[default]
    None = 0,
    TestButtonClick = 1,
    MainMenuBgm = 2,
    WindowOpen = 3,
    WindowClose = 4,
  }
}

cfgdata_domain::config_enum! {
  #[derive(Default)]
  #[allow(clippy::upper_case_acronyms)]
  pub enum AudioGroupType {
    #[default]
    BGM = 0,
    SFX = 1,
    UI = 2,
  }
}
