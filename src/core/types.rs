//! 客户端 API 共享数据类型
//!
//! 驱动与包装层之间传递的值、枚举选项和小型结构体

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// SQL 值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    TinyInt(i8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    /// 十进制数，以规范化字符串保存以保留精度
    Decimal(String),
    String(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    Array(Vec<Value>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            Value::TinyInt(v) => Some(*v != 0),
            Value::SmallInt(v) => Some(*v != 0),
            Value::Int(v) => Some(*v != 0),
            Value::BigInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// 整数类值转换为 i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(v) => Some(*v as i64),
            Value::TinyInt(v) => Some(*v as i64),
            Value::SmallInt(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::BigInt(v) => Some(*v),
            Value::Decimal(v) | Value::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            Value::Decimal(v) | Value::String(v) => v.trim().parse().ok(),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// 文本表示，NULL 与二进制值没有文本表示
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null | Value::Bytes(_) => None,
            Value::String(v) | Value::Decimal(v) => Some(v.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn as_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(v) => Some(v.clone()),
            Value::String(v) => Some(v.as_bytes().to_vec()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(v) => Some(*v),
            Value::Timestamp(v) => Some(v.date()),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(v) => Some(*v),
            Value::Timestamp(v) => Some(v.time()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(v) => Some(*v),
            Value::Date(v) => v.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }

    /// 值对应的 SQL 类型
    pub fn sql_type(&self) -> SqlType {
        match self {
            Value::Null => SqlType::Null,
            Value::Bool(_) => SqlType::Boolean,
            Value::TinyInt(_) => SqlType::TinyInt,
            Value::SmallInt(_) => SqlType::SmallInt,
            Value::Int(_) => SqlType::Integer,
            Value::BigInt(_) => SqlType::BigInt,
            Value::Float(_) => SqlType::Real,
            Value::Double(_) => SqlType::Double,
            Value::Decimal(_) => SqlType::Decimal,
            Value::String(_) => SqlType::VarChar,
            Value::Bytes(_) => SqlType::VarBinary,
            Value::Date(_) => SqlType::Date,
            Value::Time(_) => SqlType::Time,
            Value::Timestamp(_) => SqlType::Timestamp,
            Value::Array(_) => SqlType::Array,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::TinyInt(v) => write!(f, "{}", v),
            Value::SmallInt(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "'{}'", v),
            Value::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Value::Date(v) => write!(f, "{}", v),
            Value::Time(v) => write!(f, "{}", v),
            Value::Timestamp(v) => write!(f, "{}", v),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// SQL 类型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    Null,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Binary,
    VarBinary,
    Blob,
    Clob,
    Date,
    Time,
    Timestamp,
    Array,
    Struct,
    /// 驱动私有类型代码
    Other(i32),
}

/// 结果集游标类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResultSetType {
    #[default]
    ForwardOnly,
    ScrollInsensitive,
    ScrollSensitive,
}

/// 结果集并发模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Concurrency {
    #[default]
    ReadOnly,
    Updatable,
}

/// 提交后游标保持性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Holdability {
    HoldCursorsOverCommit,
    CloseCursorsAtCommit,
}

/// 抓取方向提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchDirection {
    #[default]
    Forward,
    Reverse,
    Unknown,
}

/// 事务隔离级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IsolationLevel {
    None,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// 自动生成键的返回方式
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GeneratedKeys {
    #[default]
    NotReturned,
    Returned,
    /// 按列序号返回（从 1 开始）
    Columns(Vec<usize>),
    /// 按列名返回
    Names(Vec<String>),
}

/// 创建语句时的结果集选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatementOptions {
    pub result_set_type: ResultSetType,
    pub concurrency: Concurrency,
    /// None 表示使用连接的默认保持性
    pub holdability: Option<Holdability>,
}

impl StatementOptions {
    pub fn new(result_set_type: ResultSetType, concurrency: Concurrency) -> Self {
        Self {
            result_set_type,
            concurrency,
            holdability: None,
        }
    }

    pub fn with_holdability(mut self, holdability: Holdability) -> Self {
        self.holdability = Some(holdability);
        self
    }
}

/// 切换到下一个结果时对当前结果集的处理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoreResults {
    CloseCurrent,
    KeepCurrent,
    CloseAll,
}

/// 保存点
///
/// 未命名保存点由驱动分配 id，命名保存点只有名称
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Savepoint {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Savepoint {
    pub fn unnamed(id: i64) -> Self {
        Self { id: Some(id), name: None }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { id: None, name: Some(name.into()) }
    }
}

/// 驱动报告的警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub message: String,
    pub sql_state: String,
    pub vendor_code: i32,
}

/// 结果集列引用：序号（从 1 开始）或标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column<'a> {
    Index(usize),
    Label(&'a str),
}

impl From<usize> for Column<'_> {
    fn from(index: usize) -> Self {
        Column::Index(index)
    }
}

impl<'a> From<&'a str> for Column<'a> {
    fn from(label: &'a str) -> Self {
        Column::Label(label)
    }
}

impl fmt::Display for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Index(i) => write!(f, "#{}", i),
            Column::Label(l) => write!(f, "{}", l),
        }
    }
}

/// 存储过程参数引用：序号（从 1 开始）或名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for Param<'_> {
    fn from(index: usize) -> Self {
        Param::Index(index)
    }
}

impl<'a> From<&'a str> for Param<'a> {
    fn from(name: &'a str) -> Self {
        Param::Name(name)
    }
}

/// 列或参数的可空性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nullability {
    NoNulls,
    Nullable,
    Unknown,
}

/// 参数方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterMode {
    In,
    InOut,
    Out,
    Unknown,
}

/// 驱动创建的数组值
#[derive(Debug, Clone, PartialEq)]
pub struct SqlArray {
    pub base_type_name: String,
    pub elements: Vec<Value>,
}

/// 驱动创建的结构化类型值
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStruct {
    pub type_name: String,
    pub attributes: Vec<Value>,
}

/// 自省查询使用的类型键
///
/// 同时保存 `TypeId` 和类型名，后者只用于错误消息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 判断给定对象是否恰好是该类型
    pub fn matches(&self, value: &dyn Any) -> bool {
        Any::type_id(value) == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_sql_type() {
        assert_eq!(Value::Int(1).sql_type(), SqlType::Integer);
        assert_eq!(Value::Null.sql_type(), SqlType::Null);
        assert_eq!(Value::Decimal("1.50".into()).sql_type(), SqlType::Decimal);
        assert!(Value::Null.is_null());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::SmallInt(7).as_i64(), Some(7));
        assert_eq!(Value::String(" 42 ".into()).as_i64(), Some(42));
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Null.as_text(), None);
        assert_eq!(Value::Int(5).as_text(), Some("5".to_string()));
        assert_eq!(Value::Bytes(vec![1]).as_i64(), None);

        let ts = NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(Value::Timestamp(ts).as_date(), NaiveDate::from_ymd_opt(2024, 5, 17));
        assert_eq!(Value::Timestamp(ts).as_time(), NaiveTime::from_hms_opt(8, 30, 0));
    }

    #[test]
    fn test_value_display() {
        let v = Value::Array(vec![Value::Int(1), Value::String("a".into()), Value::Null]);
        assert_eq!(v.to_string(), "[1, 'a', NULL]");
        assert_eq!(Value::Bytes(vec![1, 2, 3]).to_string(), "<3 bytes>");
    }

    #[test]
    fn test_column_from() {
        assert_eq!(Column::from(2), Column::Index(2));
        assert_eq!(Column::from("name"), Column::Label("name"));
        assert_eq!(Param::from("p_id"), Param::Name("p_id"));
    }

    #[test]
    fn test_type_key_matches() {
        let key = TypeKey::of::<String>();
        let s = String::from("x");
        assert!(key.matches(&s));
        assert!(!key.matches(&1u32));
        assert!(key.name().contains("String"));
    }

    #[test]
    fn test_statement_options() {
        let opts = StatementOptions::new(ResultSetType::ScrollInsensitive, Concurrency::Updatable)
            .with_holdability(Holdability::CloseCursorsAtCommit);
        assert_eq!(opts.result_set_type, ResultSetType::ScrollInsensitive);
        assert_eq!(opts.holdability, Some(Holdability::CloseCursorsAtCommit));
        assert_eq!(StatementOptions::default().concurrency, Concurrency::ReadOnly);
    }
}
