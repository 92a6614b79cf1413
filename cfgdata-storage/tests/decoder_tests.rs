use std::borrow::Cow;
use std::sync::OnceLock;

use cfgdata_domain::datetime::{min_date_time, parse_date_time};
use cfgdata_domain::{ConversionError, FieldType, Record, RecordSchema, Value};
use cfgdata_storage::test_support::{header_with_columns, raw_header, table_bytes};
use cfgdata_storage::{
  decode_rows, decode_table, encode_records, ConversionPolicy, DecodeError, DecodeOptions, EncodeError, Location,
  ReadError,
};
use chrono::{NaiveDate, NaiveDateTime};

type TestResult = Result<(), Box<dyn std::error::Error>>;

cfgdata_domain::config_enum! {
  #[derive(Default)]
  pub enum Element {
    #[default]
    None = 0,
    Fire = 1,
    Water = 2,
  }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Monster {
  id: i32,
  name: String,
  hp: i64,
  speed: f32,
  boss: bool,
  spawn: NaiveDateTime,
  element: Element,
}

impl Record for Monster {
  const TABLE_NAME: &'static str = "Monster";

  fn schema() -> &'static RecordSchema<Self> {
    static SCHEMA: OnceLock<RecordSchema<Monster>> = OnceLock::new();
    SCHEMA.get_or_init(|| {
      RecordSchema::builder("Monster")
        .int32("id", |r: &Monster| r.id, |r, v| r.id = v)
        .text("name", |r: &Monster| r.name.clone(), |r, v| r.name = v)
        .int64("hp", |r: &Monster| r.hp, |r, v| r.hp = v)
        .float32("speed", |r: &Monster| r.speed, |r, v| r.speed = v)
        .boolean("boss", |r: &Monster| r.boss, |r, v| r.boss = v)
        .date_time("spawn", |r: &Monster| r.spawn, |r, v| r.spawn = v)
        .enumeration("element", |r: &Monster| r.element, |r, v| r.element = v)
        .build()
    })
  }
}

fn text(s: &str) -> Value<'_> {
  Value::Text(Cow::Borrowed(s))
}

fn opts() -> DecodeOptions {
  DecodeOptions::default()
}

#[test]
fn decodes_id_name_table() -> TestResult {
  let bytes = table_bytes(
    &[("ID", FieldType::Int32), ("Name", FieldType::String)],
    vec![vec![Value::Int32(1), text("Alice")], vec![Value::Int32(2), text("Bob")]],
  )?;

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;

  assert_eq!(snapshot.len(), 2);
  assert_eq!(snapshot.get_by_id(2).map(|m| m.name.as_str()), Some("Bob"));
  assert_eq!(snapshot.records()[0].name, "Alice");
  assert!(snapshot.get_by_id(3).is_none());
  Ok(())
}

#[test]
fn columns_match_members_ignoring_case() -> TestResult {
  let bytes = table_bytes(
    &[("ID", FieldType::Int32), ("NAME", FieldType::String), ("Boss", FieldType::Bool)],
    vec![vec![Value::Int32(5), text("Dragon"), Value::Bool(true)]],
  )?;

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  let dragon = snapshot.get_by_id(5).ok_or("missing")?;
  assert_eq!(dragon.name, "Dragon");
  assert!(dragon.boss);
  Ok(())
}

#[test]
fn unmatched_columns_are_consumed_and_discarded() -> TestResult {
  let bytes = table_bytes(
    &[
      ("Id", FieldType::Int32),
      ("Comment", FieldType::String),
      ("Weight", FieldType::Int64),
      ("Name", FieldType::String),
    ],
    vec![
      vec![Value::Int32(1), text("ignored text"), Value::Int64(99), text("Slime")],
      vec![Value::Int32(2), text(""), Value::Int64(-1), text("Bat")],
    ],
  )?;

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  let names: Vec<&str> = snapshot.records().iter().map(|m| m.name.as_str()).collect();
  assert_eq!(names, vec!["Slime", "Bat"]);
  // 没有对应列的成员保持默认值
  assert_eq!(snapshot.records()[0].hp, 0);
  Ok(())
}

#[test]
fn unknown_type_tag_is_read_as_string() -> TestResult {
  let mut w = header_with_columns(&[("Id", 1), ("Extra", 42), ("Name", 0)], 1);
  w.write_i32(7);
  w.write_string("opaque");
  w.write_string("Ghost");
  let bytes = w.into_inner();

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.get_by_id(7).map(|m| m.name.as_str()), Some("Ghost"));

  let unknown: Vec<&str> = snapshot.header().unknown_columns().map(|c| c.name.as_str()).collect();
  assert_eq!(unknown, vec!["Extra"]);
  Ok(())
}

#[test]
fn empty_table_has_no_rows() -> TestResult {
  let snapshot = decode_table::<Monster>(&raw_header(0, 0), &opts())?;
  assert!(snapshot.is_empty());
  Ok(())
}

#[test]
fn zero_fields_with_rows_and_no_data_is_corrupt() {
  let err = decode_table::<Monster>(&raw_header(0, 1_000_000), &opts()).unwrap_err();
  assert!(err.is_corrupt());
  assert!(matches!(
    err,
    DecodeError::Truncated { location: Location::Row { row: 0 }, source: ReadError::UnexpectedEof { offset: 8, .. } }
  ));

  let err = decode_rows(&raw_header(0, 3)).unwrap_err();
  assert!(matches!(err, DecodeError::Truncated { location: Location::Row { row: 0 }, .. }));
}

#[test]
fn zero_fields_with_trailing_data_produces_default_records() -> TestResult {
  let mut bytes = raw_header(0, 3);
  bytes.push(0);

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.len(), 3);
  assert_eq!(*snapshot.records()[0], Monster::default());
  assert_eq!(snapshot.indexed_count(), 0);
  Ok(())
}

#[test]
fn encode_records_rejects_dates_past_year_9999() {
  let year_12000 = NaiveDate::from_ymd_opt(12_000, 6, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
  let monsters = [
    Monster { id: 1, ..Default::default() },
    Monster { id: 2, spawn: year_12000.unwrap(), ..Default::default() },
  ];

  assert!(matches!(encode_records(&monsters), Err(EncodeError::DateOutOfRange { row: 1, .. })));
}

#[test]
fn header_too_small_is_corrupt() {
  let err = decode_table::<Monster>(&[0, 0, 0, 0, 0], &opts()).unwrap_err();
  assert_eq!(err, DecodeError::HeaderTooSmall { len: 5 });
  assert!(err.is_corrupt());
}

#[test]
fn out_of_bounds_counts_are_corrupt() {
  let err = decode_table::<Monster>(&raw_header(1001, 0), &opts()).unwrap_err();
  assert_eq!(err, DecodeError::InvalidFieldCount(1001));

  let err = decode_table::<Monster>(&raw_header(1, 1_000_001), &opts()).unwrap_err();
  assert_eq!(err, DecodeError::InvalidRowCount(1_000_001));

  let err = decode_table::<Monster>(&raw_header(0, -1), &opts()).unwrap_err();
  assert!(err.is_corrupt());
}

#[test]
fn huge_row_count_with_no_data_fails_without_allocating() {
  let mut w = header_with_columns(&[("Id", 1)], 1_000_000);
  w.write_i32(1);
  let bytes = w.into_inner();

  let err = decode_table::<Monster>(&bytes, &opts()).unwrap_err();
  assert!(matches!(
    err,
    DecodeError::Truncated { location: Location::Cell { row: 1, column: 0, .. }, source: ReadError::UnexpectedEof { .. } }
  ));
}

#[test]
fn truncated_cell_names_row_and_field() -> TestResult {
  let bytes = table_bytes(
    &[("Id", FieldType::Int32), ("Name", FieldType::String)],
    vec![vec![Value::Int32(1), text("Alice")], vec![Value::Int32(2), text("Bob")]],
  )?;
  let cut = &bytes[..bytes.len() - 2];

  let err = decode_table::<Monster>(cut, &opts()).unwrap_err();
  assert_eq!(
    err,
    DecodeError::Truncated {
      location: Location::Cell { row: 1, column: 1, field: "Name".to_string() },
      source: ReadError::UnexpectedEof { offset: cut.len() - 1, needed: 3, remaining: 1 },
    }
  );
  assert!(err.to_string().contains("row 1, column 1 ('Name')"));
  Ok(())
}

#[test]
fn truncated_column_definition() {
  let mut bytes = header_with_columns(&[("Id", 1), ("Name", 0)], 0).into_inner();
  bytes.truncate(bytes.len() - 1);

  let err = decode_table::<Monster>(&bytes, &opts()).unwrap_err();
  assert!(matches!(err, DecodeError::Truncated { location: Location::Column { index: 1 }, .. }));
}

#[test]
fn trailing_bytes_are_ignored() -> TestResult {
  let mut bytes = table_bytes(&[("Id", FieldType::Int32)], vec![vec![Value::Int32(4)]])?;
  bytes.extend_from_slice(&[0xDE, 0xAD]);

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.len(), 1);
  Ok(())
}

#[test]
fn date_time_column_into_each_member_kind() -> TestResult {
  let dt = parse_date_time("2024-03-01 12:30:00").ok_or("bad date")?;

  // DateTime -> Int32（Unix 秒）/ String（格式化）/ DateTime
  let bytes = table_bytes(
    &[("id", FieldType::DateTime), ("name", FieldType::DateTime), ("spawn", FieldType::DateTime)],
    vec![vec![Value::DateTime(dt), Value::DateTime(dt), Value::DateTime(dt)]],
  )?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  let m = &snapshot.records()[0];
  assert_eq!(m.id, 1_709_296_200);
  assert_eq!(m.name, "2024-03-01 12:30:00");
  assert_eq!(m.spawn, dt);

  // DateTime -> Int64（tick）
  let bytes = table_bytes(&[("hp", FieldType::DateTime)], vec![vec![Value::DateTime(min_date_time())]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.records()[0].hp, 0);
  Ok(())
}

#[test]
fn out_of_range_ticks_decode_as_min_date() -> TestResult {
  let mut w = header_with_columns(&[("spawn", 5), ("id", 5)], 1);
  w.write_i64(-5);
  w.write_i64(i64::MAX);
  let bytes = w.into_inner();

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  let m = &snapshot.records()[0];
  assert_eq!(m.spawn, min_date_time());
  // 最小日期映射为 0
  assert_eq!(m.id, 0);
  Ok(())
}

#[test]
fn date_time_member_from_other_columns() -> TestResult {
  let bytes = table_bytes(&[("spawn", FieldType::String)], vec![vec![text("2020-01-02 03:04:05")]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(Some(snapshot.records()[0].spawn), parse_date_time("2020-01-02 03:04:05"));

  // 无法解析的字符串：成员保持零值
  let bytes = table_bytes(&[("spawn", FieldType::String)], vec![vec![text("soon")]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.records()[0].spawn, NaiveDateTime::default());

  let bytes = table_bytes(&[("spawn", FieldType::Int32)], vec![vec![Value::Int32(86_400)]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(Some(snapshot.records()[0].spawn), parse_date_time("1970-01-02 00:00:00"));
  Ok(())
}

#[test]
fn enum_member_from_name_or_ordinal() -> TestResult {
  let bytes = table_bytes(&[("element", FieldType::String)], vec![vec![text("Water")]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.records()[0].element, Element::Water);

  let bytes = table_bytes(&[("element", FieldType::Enum)], vec![vec![Value::Int32(1)]])?;
  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.records()[0].element, Element::Fire);

  let bytes = table_bytes(&[("element", FieldType::String)], vec![vec![text("water")]])?;
  let err = decode_table::<Monster>(&bytes, &opts()).unwrap_err();
  assert!(matches!(err, DecodeError::Conversion { source: ConversionError::UnknownEnumMember { .. }, .. }));
  Ok(())
}

#[test]
fn conversion_failure_reports_cell() -> TestResult {
  let bytes = table_bytes(
    &[("id", FieldType::Int32), ("hp", FieldType::String)],
    vec![vec![Value::Int32(1), text("100")], vec![Value::Int32(2), text("lots")]],
  )?;

  let err = decode_table::<Monster>(&bytes, &opts()).unwrap_err();
  assert!(!err.is_corrupt());
  match err {
    DecodeError::Conversion { row, column, field, member, .. } => {
      assert_eq!((row, column, field.as_str(), member), (1, 1, "hp", "hp"));
    }
    other => return Err(format!("unexpected error: {other}").into()),
  }
  Ok(())
}

#[test]
fn skip_field_policy_keeps_default() -> TestResult {
  let bytes = table_bytes(
    &[("id", FieldType::Int64), ("hp", FieldType::String)],
    vec![vec![Value::Int64(i64::MAX), text("lots")], vec![Value::Int64(9), text("12")]],
  )?;

  let options = DecodeOptions::with_policy(ConversionPolicy::SkipField);
  let snapshot = decode_table::<Monster>(&bytes, &options)?;

  assert_eq!(snapshot.len(), 2);
  assert_eq!(snapshot.records()[0].id, 0);
  assert_eq!(snapshot.records()[0].hp, 0);
  assert_eq!(snapshot.get_by_id(9).map(|m| m.hp), Some(12));
  Ok(())
}

#[test]
fn invalid_utf8_is_replaced() -> TestResult {
  let mut w = header_with_columns(&[("name", 0)], 1);
  w.write_7bit_len(3);
  w.write_bytes(&[b'o', 0xC0, b'k']);
  let bytes = w.into_inner();

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.records()[0].name, "o\u{FFFD}k");
  Ok(())
}

#[test]
fn encode_records_uses_schema_columns() -> TestResult {
  let monster = Monster {
    id: 3,
    name: "Golem".to_string(),
    hp: 5000,
    speed: 0.5,
    boss: true,
    spawn: parse_date_time("2023-07-07 07:07:07").ok_or("bad date")?,
    element: Element::Fire,
  };
  let bytes = encode_records(std::slice::from_ref(&monster))?;

  let raw = decode_rows(&bytes)?;
  let names: Vec<&str> = raw.header.columns.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, vec!["id", "name", "hp", "speed", "boss", "spawn", "element"]);
  assert_eq!(raw.header.columns[6].field_type, FieldType::Enum);
  assert_eq!(raw.cell(0, "ELEMENT"), Some(&Value::Int32(1)));

  let snapshot = decode_table::<Monster>(&bytes, &opts())?;
  assert_eq!(snapshot.get_by_id(3).map(|m| (**m).clone()), Some(monster));
  Ok(())
}

#[test]
fn decode_rows_borrows_strings() -> TestResult {
  let bytes = table_bytes(&[("Name", FieldType::String)], vec![vec![text("borrowed")]])?;
  let raw = decode_rows(&bytes)?;
  assert!(matches!(raw.rows[0].get(0), Some(Value::Text(Cow::Borrowed("borrowed")))));
  Ok(())
}
