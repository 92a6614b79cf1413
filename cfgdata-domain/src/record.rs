//! 记录绑定表
//!
//! 每个记录类型声明一张静态绑定表（成员名 -> 类型化 getter/setter），
//! 解码时按列名（忽略大小写）把列映射到成员，无需运行时反射。
//! 绑定表每个类型只构建一次，由 `Record::schema()` 缓存。

use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::field_type::FieldType;
use crate::ids::RecordId;
use crate::snapshot::SecondaryIndex;
use crate::value::Value;

/// 记录类型
///
/// 一个记录类型对应一张表（一个 `<TABLE_NAME>.data` 文件）。
/// 未被任何列赋值的成员保持 `Default` 值。
pub trait Record: Default + Send + Sync + 'static {
  /// 表名（数据文件名主干，如 `"Sample"` 对应 `Sample.data`）
  const TABLE_NAME: &'static str;

  /// 静态绑定表（每个类型构建一次并缓存）
  fn schema() -> &'static RecordSchema<Self>;

  /// 加载成功后在快照中构建的二级索引
  fn secondary_indexes() -> Vec<SecondaryIndex<Self>> {
    Vec::new()
  }
}

/// 配置枚举
///
/// 枚举成员既可以从变体名（区分大小写）解析，也可以从整数序号转换。
/// 一般通过 `config_enum!` 宏实现。
pub trait ConfigEnum: Copy + Send + Sync + 'static {
  const TYPE_NAME: &'static str;
  const VARIANTS: &'static [(&'static str, Self)];

  fn ordinal(self) -> i32;

  fn from_ordinal(ordinal: i32) -> Option<Self> {
    Self::VARIANTS.iter().find(|(_, v)| v.ordinal() == ordinal).map(|(_, v)| *v)
  }

  fn variant_name(self) -> &'static str {
    Self::VARIANTS
      .iter()
      .find(|(_, v)| v.ordinal() == self.ordinal())
      .map(|(name, _)| *name)
      .unwrap_or("")
  }
}

/// 声明配置枚举并实现 `ConfigEnum`
///
/// # Examples
///
/// cfgdata_domain::config_enum! {
///   #[derive(Default)]
///   pub enum SampleType {
///     #[default]
///     None = 0,
///     Weapon = 1,
///   }
/// }
#[macro_export]
macro_rules! config_enum {
  (
    $(#[$meta:meta])*
    $vis:vis enum $name:ident {
      $( $(#[$vmeta:meta])* $variant:ident = $ordinal:expr ),+ $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(i32)]
    $vis enum $name {
      $( $(#[$vmeta])* $variant = $ordinal ),+
    }

    impl $crate::ConfigEnum for $name {
      const TYPE_NAME: &'static str = stringify!($name);
      const VARIANTS: &'static [(&'static str, Self)] =
        &[ $( (stringify!($variant), $name::$variant) ),+ ];

      fn ordinal(self) -> i32 {
        self as i32
      }
    }
  };
}

/// 枚举成员的类型擦除描述（变体名 + 序号）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
  pub type_name: &'static str,
  pub variants: Vec<(&'static str, i32)>,
}

impl EnumDescriptor {
  pub fn of<E: ConfigEnum>() -> Self {
    Self {
      type_name: E::TYPE_NAME,
      variants: E::VARIANTS.iter().map(|(name, v)| (*name, v.ordinal())).collect(),
    }
  }

  /// 变体名 -> 序号（区分大小写）
  pub fn ordinal_of(&self, name: &str) -> Option<i32> {
    self.variants.iter().find(|(n, _)| *n == name).map(|(_, o)| *o)
  }

  pub fn contains(&self, ordinal: i32) -> bool {
    self.variants.iter().any(|(_, o)| *o == ordinal)
  }
}

/// 成员类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
  Int32,
  Int64,
  Float32,
  Bool,
  Text,
  DateTime,
  Enum(EnumDescriptor),
}

impl MemberKind {
  pub fn name(&self) -> &'static str {
    match self {
      MemberKind::Int32 => "Int32",
      MemberKind::Int64 => "Int64",
      MemberKind::Float32 => "Float32",
      MemberKind::Bool => "Bool",
      MemberKind::Text => "String",
      MemberKind::DateTime => "DateTime",
      MemberKind::Enum(desc) => desc.type_name,
    }
  }

  /// 写出该成员时使用的列类型标签
  pub fn field_type(&self) -> FieldType {
    match self {
      MemberKind::Int32 => FieldType::Int32,
      MemberKind::Int64 => FieldType::Int64,
      MemberKind::Float32 => FieldType::Float32,
      MemberKind::Bool => FieldType::Bool,
      MemberKind::Text => FieldType::String,
      MemberKind::DateTime => FieldType::DateTime,
      MemberKind::Enum(_) => FieldType::Enum,
    }
  }
}

/// 已转换为成员类型的值
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
  Int32(i32),
  Int64(i64),
  Float32(f32),
  Bool(bool),
  Text(String),
  DateTime(NaiveDateTime),
  /// 枚举序号（已确认属于该枚举）
  Enum(i32),
}

impl MemberValue {
  /// 转为可写出的单元格值（枚举写为 Int32 序号）
  pub fn into_value(self) -> Value<'static> {
    match self {
      MemberValue::Int32(i) | MemberValue::Enum(i) => Value::Int32(i),
      MemberValue::Int64(i) => Value::Int64(i),
      MemberValue::Float32(f) => Value::Float32(f),
      MemberValue::Bool(b) => Value::Bool(b),
      MemberValue::Text(s) => Value::Text(Cow::Owned(s)),
      MemberValue::DateTime(dt) => Value::DateTime(dt),
    }
  }
}

type Getter<R> = Box<dyn Fn(&R) -> MemberValue + Send + Sync>;
type Setter<R> = Box<dyn Fn(&mut R, MemberValue) + Send + Sync>;

/// 单个成员的绑定：名称、类型、读写函数
pub struct MemberBinding<R> {
  name: &'static str,
  kind: MemberKind,
  get: Getter<R>,
  set: Setter<R>,
}

impl<R> MemberBinding<R> {
  #[inline]
  pub fn name(&self) -> &'static str {
    self.name
  }

  #[inline]
  pub fn kind(&self) -> &MemberKind {
    &self.kind
  }

  pub fn get(&self, record: &R) -> MemberValue {
    (self.get)(record)
  }

  /// 写入成员；值的种类必须与 `kind()` 一致（由转换层保证），否则忽略
  pub fn set(&self, record: &mut R, value: MemberValue) {
    (self.set)(record, value)
  }
}

impl<R> fmt::Debug for MemberBinding<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MemberBinding").field("name", &self.name).field("kind", &self.kind).finish()
  }
}

/// 记录类型的绑定表
///
/// 不变量:
/// - 成员名忽略大小写唯一；重复声明时第一个生效
/// - `id_member` 指向名为 "id"（忽略大小写）的成员（如果有）
#[derive(Debug)]
pub struct RecordSchema<R> {
  record_name: &'static str,
  members: Vec<MemberBinding<R>>,
  by_name: HashMap<String, usize>,
  id_member: Option<usize>,
}

impl<R> RecordSchema<R> {
  pub fn builder(record_name: &'static str) -> RecordSchemaBuilder<R> {
    RecordSchemaBuilder { record_name, members: Vec::new() }
  }

  #[inline]
  pub fn record_name(&self) -> &'static str {
    self.record_name
  }

  #[inline]
  pub fn members(&self) -> &[MemberBinding<R>] {
    &self.members
  }

  /// 按名称查找成员下标（忽略大小写）
  pub fn member_index(&self, name: &str) -> Option<usize> {
    self.by_name.get(&name.to_lowercase()).copied()
  }

  pub fn member(&self, name: &str) -> Option<&MemberBinding<R>> {
    self.member_index(name).and_then(|idx| self.members.get(idx))
  }

  #[inline]
  pub fn binding(&self, index: usize) -> Option<&MemberBinding<R>> {
    self.members.get(index)
  }

  /// 读取记录的 id 成员
  ///
  /// 只有 Int32（或范围内的 Int64）成员可作为 id；其它类型或没有 id 成员时返回 `None`。
  pub fn record_id(&self, record: &R) -> Option<RecordId> {
    let binding = self.id_member.and_then(|idx| self.members.get(idx))?;
    match binding.get(record) {
      MemberValue::Int32(id) => Some(RecordId::new(id)),
      MemberValue::Int64(id) => i32::try_from(id).ok().map(RecordId::new),
      _ => None,
    }
  }

  #[inline]
  pub fn has_id_member(&self) -> bool {
    self.id_member.is_some()
  }
}

/// 绑定表构建器
///
/// # Examples
///
/// use cfgdata_domain::RecordSchema;
///
/// #[derive(Default)]
/// struct Item { id: i32, name: String }
///
/// let schema = RecordSchema::<Item>::builder("Item")
///   .int32("Id", |r| r.id, |r, v| r.id = v)
///   .text("Name", |r| r.name.clone(), |r, v| r.name = v)
///   .build();
///
/// assert!(schema.member("name").is_some());
pub struct RecordSchemaBuilder<R> {
  record_name: &'static str,
  members: Vec<MemberBinding<R>>,
}

impl<R> RecordSchemaBuilder<R> {
  fn push(mut self, name: &'static str, kind: MemberKind, get: Getter<R>, set: Setter<R>) -> Self {
    self.members.push(MemberBinding { name, kind, get, set });
    self
  }

  pub fn int32<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> i32 + Send + Sync + 'static,
    S: Fn(&mut R, i32) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Int32,
      Box::new(move |r| MemberValue::Int32(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::Int32(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn int64<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> i64 + Send + Sync + 'static,
    S: Fn(&mut R, i64) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Int64,
      Box::new(move |r| MemberValue::Int64(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::Int64(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn float32<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> f32 + Send + Sync + 'static,
    S: Fn(&mut R, f32) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Float32,
      Box::new(move |r| MemberValue::Float32(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::Float32(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn boolean<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> bool + Send + Sync + 'static,
    S: Fn(&mut R, bool) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Bool,
      Box::new(move |r| MemberValue::Bool(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::Bool(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn text<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> String + Send + Sync + 'static,
    S: Fn(&mut R, String) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Text,
      Box::new(move |r| MemberValue::Text(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::Text(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn date_time<G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    G: Fn(&R) -> NaiveDateTime + Send + Sync + 'static,
    S: Fn(&mut R, NaiveDateTime) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::DateTime,
      Box::new(move |r| MemberValue::DateTime(get(r))),
      Box::new(move |r, v| {
        if let MemberValue::DateTime(v) = v {
          set(r, v)
        }
      }),
    )
  }

  pub fn enumeration<E, G, S>(self, name: &'static str, get: G, set: S) -> Self
  where
    E: ConfigEnum,
    G: Fn(&R) -> E + Send + Sync + 'static,
    S: Fn(&mut R, E) + Send + Sync + 'static,
  {
    self.push(
      name,
      MemberKind::Enum(EnumDescriptor::of::<E>()),
      Box::new(move |r| MemberValue::Enum(get(r).ordinal())),
      Box::new(move |r, v| {
        if let MemberValue::Enum(ordinal) = v {
          if let Some(e) = E::from_ordinal(ordinal) {
            set(r, e)
          }
        }
      }),
    )
  }

  pub fn build(self) -> RecordSchema<R> {
    let mut by_name = HashMap::with_capacity(self.members.len());
    for (idx, member) in self.members.iter().enumerate() {
      by_name.entry(member.name.to_lowercase()).or_insert(idx);
    }
    let id_member = by_name.get("id").copied();

    RecordSchema { record_name: self.record_name, members: self.members, by_name, id_member }
  }
}
