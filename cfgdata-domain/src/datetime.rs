//! 日期时间与 tick 换算
//!
//! 文件中的 DateTime 以 i64 tick 计数存储：1 tick = 100ns，起点为 0001-01-01 00:00:00，
//! 上限为 9999-12-31 23:59:59.9999999。

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 每秒 tick 数
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// 可表示的最大 tick（9999-12-31 23:59:59.9999999）
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

/// Unix 纪元（1970-01-01）对应的 tick
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// 文本格式：`yyyy-MM-dd HH:mm:ss`
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 可表示的最小日期（0001-01-01 00:00:00），tick 越界时的替代值
pub fn min_date_time() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(1, 1, 1)
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .unwrap_or_default()
}

/// tick -> 日期时间；超出可表示范围返回 `None`
///
/// # Examples
///
/// use cfgdata_domain::datetime::{ticks_to_date_time, UNIX_EPOCH_TICKS};
///
/// let dt = ticks_to_date_time(UNIX_EPOCH_TICKS).unwrap();
/// assert_eq!(dt.to_string(), "1970-01-01 00:00:00");
/// assert!(ticks_to_date_time(-1).is_none());
///
pub fn ticks_to_date_time(ticks: i64) -> Option<NaiveDateTime> {
  if !(0..=MAX_TICKS).contains(&ticks) {
    return None;
  }

  let unix_ticks = ticks - UNIX_EPOCH_TICKS;
  let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
  let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
  DateTime::from_timestamp(secs, nanos).map(|dt| dt.naive_utc())
}

/// 日期时间 -> tick（亚 100ns 精度截断）；不在 `0..=MAX_TICKS` 内返回 `None`
pub fn date_time_to_ticks(dt: &NaiveDateTime) -> Option<i64> {
  let utc = dt.and_utc();
  let ticks = utc
    .timestamp()
    .checked_mul(TICKS_PER_SECOND)?
    .checked_add(i64::from(utc.timestamp_subsec_nanos() / 100))?
    .checked_add(UNIX_EPOCH_TICKS)?;
  (0..=MAX_TICKS).contains(&ticks).then_some(ticks)
}

/// Unix 纪元秒 -> 日期时间；超出可表示范围返回 `None`
pub fn unix_seconds_to_date_time(secs: i64) -> Option<NaiveDateTime> {
  let ticks = secs
    .checked_mul(TICKS_PER_SECOND)?
    .checked_add(UNIX_EPOCH_TICKS)?;
  ticks_to_date_time(ticks)
}

/// 日期时间 -> Unix 纪元秒
#[inline]
pub fn date_time_to_unix_seconds(dt: &NaiveDateTime) -> i64 {
  dt.and_utc().timestamp()
}

/// 按 `yyyy-MM-dd HH:mm:ss` 格式化
pub fn format_date_time(dt: &NaiveDateTime) -> String {
  dt.format(DATE_TIME_FORMAT).to_string()
}

/// 按 `yyyy-MM-dd HH:mm:ss` 解析；格式不符返回 `None`
pub fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
  NaiveDateTime::parse_from_str(text.trim(), DATE_TIME_FORMAT).ok()
}
