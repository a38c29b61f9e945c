//! 测试用内存驱动
//!
//! 实现全部能力接口的内存驱动，记录每一次调用及其参数，
//! 用于验证包装层"参数原样传入、结果原样返回、只调用一次"。
//!
//! 同一个连接派生出的所有对象共享一个 [`MockShared`]：调用日志、
//! 预置的查询结果和注入的失败都在其中。

pub mod connection;
pub mod metadata;
pub mod result_set;
pub mod statement;

pub use connection::MockConnection;
pub use metadata::{MockDatabaseMetaData, MockParameterMetaData, MockResultSetMetaData};
pub use result_set::MockResultSet;
pub use statement::{MockStatement, StatementKind};

use crate::core::{SqlError, SqlResult, TypeKey, Value};
use parking_lot::Mutex;
use serde::Serialize;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// 一次被记录的调用
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// 调用目标，如 `statement#3`
    pub target: String,
    pub operation: &'static str,
    /// 以 Debug 格式记录的参数
    pub args: Vec<String>,
}

/// 调用日志
#[derive(Debug, Default)]
pub struct CallLog {
    records: Mutex<Vec<CallRecord>>,
}

impl CallLog {
    pub fn record(&self, record: CallRecord) {
        self.records.lock().push(record);
    }

    pub fn records(&self) -> Vec<CallRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn last(&self) -> Option<CallRecord> {
        self.records.lock().last().cloned()
    }

    /// 某个操作被调用的次数
    pub fn count(&self, operation: &str) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|r| r.operation == operation)
            .count()
    }

    /// 某个目标上的全部调用
    pub fn calls_for(&self, target: &str) -> Vec<CallRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.target == target)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }

    pub fn to_json(&self) -> SqlResult<String> {
        serde_json::to_string_pretty(&*self.records.lock())
            .map_err(|e| SqlError::Io(format!("JSON序列化失败: {}", e)))
    }
}

/// 预置的查询结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl MockRows {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// 追加一行，按列数补 NULL 或截断多余的值
    pub fn with_row(mut self, mut row: Vec<Value>) -> Self {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
        self
    }
}

/// 同一连接派生对象之间共享的状态
#[derive(Debug, Default)]
pub struct MockShared {
    log: CallLog,
    next_id: AtomicU64,
    queries: Mutex<HashMap<String, MockRows>>,
    updates: Mutex<HashMap<String, i64>>,
    failures: Mutex<HashMap<String, SqlError>>,
}

impl MockShared {
    pub fn log(&self) -> &CallLog {
        &self.log
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn register_query(&self, sql: &str, rows: MockRows) {
        self.queries.lock().insert(sql.to_string(), rows);
    }

    pub fn register_update(&self, sql: &str, count: i64) {
        self.updates.lock().insert(sql.to_string(), count);
    }

    /// 下一次调用 `operation`（任意对象上）时返回 `error`
    pub fn fail_next(&self, operation: &str, error: SqlError) {
        self.failures.lock().insert(operation.to_string(), error);
    }

    pub(crate) fn rows_for(&self, sql: &str) -> MockRows {
        self.queries.lock().get(sql).cloned().unwrap_or_default()
    }

    /// 已登记为查询，或以 SELECT / WITH 开头
    pub(crate) fn is_query(&self, sql: &str) -> bool {
        if self.queries.lock().contains_key(sql) {
            return true;
        }
        let head = sql.trim_start().to_ascii_uppercase();
        head.starts_with("SELECT") || head.starts_with("WITH")
    }

    pub(crate) fn update_count_for(&self, sql: &str) -> i64 {
        self.updates.lock().get(sql).copied().unwrap_or(0)
    }

    /// 记录一次调用，并取出为该操作注入的失败
    pub(crate) fn enter(&self, target: &str, operation: &'static str, args: Vec<String>) -> SqlResult<()> {
        self.log.record(CallRecord {
            target: target.to_string(),
            operation,
            args,
        });
        match self.failures.lock().remove(operation) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// 自省请求同样记录并可注入失败；只回答对象自身的类型
    pub(crate) fn unwrap_self<'a>(
        &self,
        target: &str,
        this: &'a dyn Any,
        key: TypeKey,
    ) -> SqlResult<&'a dyn Any> {
        self.enter(target, "unwrap", vec![format!("{:?}", key.name())])?;
        if key.matches(this) {
            Ok(this)
        } else {
            Err(SqlError::NotWrapperFor(key.name()))
        }
    }

    pub(crate) fn is_self(&self, target: &str, this: &dyn Any, key: TypeKey) -> SqlResult<bool> {
        self.enter(target, "is_wrapper_for", vec![format!("{:?}", key.name())])?;
        Ok(key.matches(this))
    }
}

/// 将值转换为目标类型，SQL NULL 转换为 None
pub(crate) fn convert<T>(
    value: &Value,
    target: &str,
    f: impl FnOnce(&Value) -> Option<T>,
) -> SqlResult<Option<T>> {
    if value.is_null() {
        return Ok(None);
    }
    f(value)
        .map(Some)
        .ok_or_else(|| SqlError::InvalidArgument(format!("无法将 {} 转换为 {}", value, target)))
}

/// 以 Debug 格式收集参数
macro_rules! args {
    () => { Vec::<String>::new() };
    ($($arg:expr),+ $(,)?) => { vec![$(format!("{:?}", $arg)),+] };
}

pub(crate) use args;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_queries() {
        let shared = MockShared::default();
        shared.enter("connection#1", "commit", args!()).unwrap();
        shared
            .enter("statement#2", "execute_update", args!("DELETE FROM t"))
            .unwrap();
        shared
            .enter("statement#2", "execute_update", args!("DELETE FROM u"))
            .unwrap();

        let log = shared.log();
        assert_eq!(log.len(), 3);
        assert_eq!(log.count("execute_update"), 2);
        assert_eq!(log.calls_for("statement#2").len(), 2);
        assert_eq!(log.last().unwrap().args, vec!["\"DELETE FROM u\"".to_string()]);
        assert!(log.to_json().unwrap().contains("execute_update"));
    }

    #[test]
    fn test_fail_next_applies_once() {
        let shared = MockShared::default();
        shared.fail_next("commit", SqlError::database("40001", 1213, "deadlock"));
        let err = shared.enter("connection#1", "commit", args!()).unwrap_err();
        assert_eq!(err.sql_state(), "40001");
        assert!(shared.enter("connection#1", "commit", args!()).is_ok());
        assert_eq!(shared.log().count("commit"), 2);
    }

    #[test]
    fn test_registered_results() {
        let shared = MockShared::default();
        shared.register_update("UPDATE t SET a = 1", 4);
        shared.register_query(
            "SELECT a FROM t",
            MockRows::new(&["a"]).with_row(vec![Value::Int(1)]),
        );
        assert_eq!(shared.update_count_for("UPDATE t SET a = 1"), 4);
        assert_eq!(shared.update_count_for("UPDATE other"), 0);
        assert_eq!(shared.rows_for("SELECT a FROM t").rows.len(), 1);
        assert!(shared.rows_for("SELECT b FROM t").columns.is_empty());
        assert!(shared.is_query("  select 1"));
        assert!(!shared.is_query("UPDATE t SET a = 1"));
    }

    #[test]
    fn test_with_row_matches_column_count() {
        let rows = MockRows::new(&["a", "b"])
            .with_row(vec![Value::Int(1)])
            .with_row(vec![Value::Int(2), Value::Int(3), Value::Int(4)]);
        assert_eq!(rows.rows[0], vec![Value::Int(1), Value::Null]);
        assert_eq!(rows.rows[1], vec![Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert(&Value::Null, "i64", Value::as_i64).unwrap(), None);
        assert_eq!(convert(&Value::Int(9), "i64", Value::as_i64).unwrap(), Some(9));
        assert!(matches!(
            convert(&Value::Bytes(vec![1]), "i64", Value::as_i64),
            Err(SqlError::InvalidArgument(_))
        ));
    }
}
