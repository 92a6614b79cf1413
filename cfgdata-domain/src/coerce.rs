//! 单元格值 -> 成员类型转换
//!
//! 规则（按顺序）:
//! 1. DateTime 列 -> Int32 成员：Unix 纪元秒（最小日期映射为 0）
//! 2. DateTime 列 -> Int64 成员：原始 tick
//! 3. DateTime 列 -> String 成员：`yyyy-MM-dd HH:mm:ss`
//! 4. 非 DateTime 列 -> DateTime 成员：Int64 视为 tick，Int32 视为 Unix 纪元秒，
//!    String 按同一格式解析；无法解析的字符串保持成员零值
//! 5. 枚举成员：变体名（区分大小写）或整数序号
//! 6. 其它：通用数值/文本/布尔转换，失败即 `ConversionError`

use chrono::NaiveDateTime;

use crate::datetime::{
  date_time_to_ticks, date_time_to_unix_seconds, format_date_time, min_date_time,
  parse_date_time, ticks_to_date_time, unix_seconds_to_date_time,
};
use crate::error::ConversionError;
use crate::record::{EnumDescriptor, MemberKind, MemberValue};
use crate::value::Value;

/// 把解码值转换为成员值
///
/// 返回 `Ok(None)` 表示成员保持零值（仅出现在规则 4 的不可解析字符串）。
///
/// # Examples
///
/// use cfgdata_domain::{coerce, MemberKind, MemberValue, Value};
///
/// assert_eq!(coerce(Value::Int32(7), &MemberKind::Int64), Ok(Some(MemberValue::Int64(7))));
/// assert!(coerce(Value::Int64(i64::MAX), &MemberKind::Int32).is_err());
///
pub fn coerce(value: Value<'_>, kind: &MemberKind) -> Result<Option<MemberValue>, ConversionError> {
  let converted = match kind {
    MemberKind::Int32 => MemberValue::Int32(to_i32(value)?),
    MemberKind::Int64 => MemberValue::Int64(to_i64(value)?),
    MemberKind::Float32 => MemberValue::Float32(to_f32(value)?),
    MemberKind::Bool => MemberValue::Bool(to_bool(value)?),
    MemberKind::Text => MemberValue::Text(to_text(value)),
    MemberKind::DateTime => match to_date_time(value)? {
      Some(dt) => MemberValue::DateTime(dt),
      None => return Ok(None),
    },
    MemberKind::Enum(desc) => MemberValue::Enum(to_enum(value, desc)?),
  };
  Ok(Some(converted))
}

fn out_of_range(value: impl ToString, to: &'static str) -> ConversionError {
  ConversionError::OutOfRange { value: value.to_string(), to }
}

fn unparseable(text: &str, to: &'static str) -> ConversionError {
  ConversionError::Unparseable { text: text.to_string(), to }
}

fn unsupported(value: &Value<'_>, to: &'static str) -> ConversionError {
  ConversionError::Unsupported { from: value.kind_name(), to }
}

/// 浮点 -> 整数：四舍六入五成双
fn float_to_i64(f: f32, to: &'static str) -> Result<i64, ConversionError> {
  let rounded = f64::from(f).round_ties_even();
  if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded >= i64::MAX as f64 {
    return Err(out_of_range(f, to));
  }
  Ok(rounded as i64)
}

fn to_i32(value: Value<'_>) -> Result<i32, ConversionError> {
  match value {
    Value::Int32(i) => Ok(i),
    Value::Int64(i) => i32::try_from(i).map_err(|_| out_of_range(i, "Int32")),
    Value::Float32(f) => {
      let i = float_to_i64(f, "Int32")?;
      i32::try_from(i).map_err(|_| out_of_range(f, "Int32"))
    }
    Value::Bool(b) => Ok(i32::from(b)),
    Value::Text(s) => s.trim().parse::<i32>().map_err(|_| unparseable(&s, "Int32")),
    Value::DateTime(dt) => date_time_to_i32(&dt),
  }
}

fn date_time_to_i32(dt: &NaiveDateTime) -> Result<i32, ConversionError> {
  if *dt == min_date_time() {
    return Ok(0);
  }
  let secs = date_time_to_unix_seconds(dt);
  i32::try_from(secs).map_err(|_| out_of_range(format_date_time(dt), "Int32"))
}

fn to_i64(value: Value<'_>) -> Result<i64, ConversionError> {
  match value {
    Value::Int32(i) => Ok(i64::from(i)),
    Value::Int64(i) => Ok(i),
    Value::Float32(f) => float_to_i64(f, "Int64"),
    Value::Bool(b) => Ok(i64::from(b)),
    Value::Text(s) => s.trim().parse::<i64>().map_err(|_| unparseable(&s, "Int64")),
    Value::DateTime(dt) => date_time_to_ticks(&dt).ok_or_else(|| out_of_range(format_date_time(&dt), "Int64")),
  }
}

fn to_f32(value: Value<'_>) -> Result<f32, ConversionError> {
  match value {
    Value::Int32(i) => Ok(i as f32),
    Value::Int64(i) => Ok(i as f32),
    Value::Float32(f) => Ok(f),
    Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
    Value::Text(s) => s.trim().parse::<f32>().map_err(|_| unparseable(&s, "Float32")),
    other @ Value::DateTime(_) => Err(unsupported(&other, "Float32")),
  }
}

fn to_bool(value: Value<'_>) -> Result<bool, ConversionError> {
  match value {
    Value::Int32(i) => Ok(i != 0),
    Value::Int64(i) => Ok(i != 0),
    Value::Float32(f) => Ok(f != 0.0),
    Value::Bool(b) => Ok(b),
    Value::Text(s) => {
      let t = s.trim();
      if t.eq_ignore_ascii_case("true") {
        Ok(true)
      } else if t.eq_ignore_ascii_case("false") {
        Ok(false)
      } else {
        Err(unparseable(&s, "Bool"))
      }
    }
    other @ Value::DateTime(_) => Err(unsupported(&other, "Bool")),
  }
}

fn to_text(value: Value<'_>) -> String {
  match value {
    Value::Text(s) => s.into_owned(),
    Value::Int32(i) => i.to_string(),
    Value::Int64(i) => i.to_string(),
    Value::Float32(f) => f.to_string(),
    Value::Bool(true) => "True".to_string(),
    Value::Bool(false) => "False".to_string(),
    Value::DateTime(dt) => format_date_time(&dt),
  }
}

fn to_date_time(value: Value<'_>) -> Result<Option<NaiveDateTime>, ConversionError> {
  match value {
    Value::DateTime(dt) => Ok(Some(dt)),
    Value::Int64(ticks) => ticks_to_date_time(ticks).map(Some).ok_or_else(|| out_of_range(ticks, "DateTime")),
    Value::Int32(secs) => unix_seconds_to_date_time(i64::from(secs))
      .map(Some)
      .ok_or_else(|| out_of_range(secs, "DateTime")),
    Value::Text(s) => Ok(parse_date_time(&s)),
    other => Err(unsupported(&other, "DateTime")),
  }
}

fn to_enum(value: Value<'_>, desc: &EnumDescriptor) -> Result<i32, ConversionError> {
  let unknown = |v: String| ConversionError::UnknownEnumMember { value: v, enum_name: desc.type_name };

  let ordinal = match value {
    Value::Text(s) => match desc.ordinal_of(&s) {
      Some(ordinal) => return Ok(ordinal),
      None => s.trim().parse::<i32>().map_err(|_| unknown(s.to_string()))?,
    },
    Value::Int32(i) => i,
    Value::Int64(i) => i32::try_from(i).map_err(|_| unknown(i.to_string()))?,
    other => return Err(unsupported(&other, desc.type_name)),
  };

  if desc.contains(ordinal) {
    Ok(ordinal)
  } else {
    Err(unknown(ordinal.to_string()))
  }
}
