//! 内存语句
//!
//! 一个类型同时实现普通语句、预编译语句和存储过程调用三种能力，
//! 由 [`StatementKind`] 区分创建方式。

use crate::api::core::{
    CallableStatement, Connection, ParameterMetaData, PreparedStatement, ResultSet,
    ResultSetMetaData, Statement, Wrapper,
};
use crate::core::{
    Concurrency, FetchDirection, GeneratedKeys, Holdability, MoreResults, Param, ResultSetType,
    SqlError, SqlResult, SqlType, StatementOptions, TypeKey, Value, Warning,
};
use crate::mock::connection::MockConnection;
use crate::mock::metadata::{MockParameterMetaData, MockResultSetMetaData};
use crate::mock::result_set::MockResultSet;
use crate::mock::{args, convert, MockRows, MockShared};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// 语句的创建方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Plain,
    Prepared,
    Callable,
}

impl StatementKind {
    fn prefix(&self) -> &'static str {
        match self {
            StatementKind::Plain => "statement",
            StatementKind::Prepared => "prepared",
            StatementKind::Callable => "callable",
        }
    }
}

#[derive(Debug, Default)]
enum CurrentResult {
    #[default]
    None,
    Rows(Arc<MockResultSet>),
    Count(i64),
}

#[derive(Debug)]
struct StatementState {
    closed: bool,
    max_field_size: usize,
    max_rows: u64,
    escape_processing: bool,
    query_timeout: Option<Duration>,
    warnings: Vec<Warning>,
    cursor_name: Option<String>,
    current: CurrentResult,
    fetch_direction: FetchDirection,
    fetch_size: usize,
    batch: Vec<String>,
    poolable: bool,
    close_on_completion: bool,
    generated: MockRows,
    params: BTreeMap<usize, Value>,
    named_params: HashMap<String, Value>,
    out_registered: HashMap<String, SqlType>,
    out_values: HashMap<String, Value>,
    was_null: bool,
}

impl StatementState {
    fn new(kind: StatementKind) -> Self {
        Self {
            closed: false,
            max_field_size: 0,
            max_rows: 0,
            escape_processing: true,
            query_timeout: None,
            warnings: Vec::new(),
            cursor_name: None,
            current: CurrentResult::None,
            fetch_direction: FetchDirection::Forward,
            fetch_size: 0,
            batch: Vec::new(),
            poolable: kind != StatementKind::Plain,
            close_on_completion: false,
            generated: MockRows::new(&["GENERATED_KEY"]),
            params: BTreeMap::new(),
            named_params: HashMap::new(),
            out_registered: HashMap::new(),
            out_values: HashMap::new(),
            was_null: false,
        }
    }
}

fn param_key(param: Param<'_>) -> String {
    match param {
        Param::Index(i) => format!("#{}", i),
        Param::Name(n) => n.to_string(),
    }
}

fn read_all(mut reader: Box<dyn Read + Send>, length: Option<u64>) -> SqlResult<Vec<u8>> {
    let mut buf = Vec::new();
    match length {
        Some(len) => {
            reader.take(len).read_to_end(&mut buf)?;
        }
        None => {
            reader.read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

/// 内存语句
#[derive(Debug)]
pub struct MockStatement {
    id: u64,
    kind: StatementKind,
    sql: Option<String>,
    options: StatementOptions,
    keys: GeneratedKeys,
    shared: Arc<MockShared>,
    connection: Weak<MockConnection>,
    state: Mutex<StatementState>,
    this: Weak<MockStatement>,
}

impl MockStatement {
    pub(crate) fn new(
        kind: StatementKind,
        sql: Option<String>,
        options: StatementOptions,
        keys: GeneratedKeys,
        shared: Arc<MockShared>,
        connection: Weak<MockConnection>,
    ) -> Arc<Self> {
        let id = shared.next_id();
        Arc::new_cyclic(|this| Self {
            id,
            kind,
            sql,
            options,
            keys,
            shared,
            connection,
            state: Mutex::new(StatementState::new(kind)),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    pub fn options(&self) -> StatementOptions {
        self.options
    }

    pub fn label(&self) -> String {
        format!("{}#{}", self.kind.prefix(), self.id)
    }

    /// 当前已绑定的位置参数
    pub fn params(&self) -> BTreeMap<usize, Value> {
        self.state.lock().params.clone()
    }

    /// 预置输出参数的值，执行后可读取
    pub fn set_out_value(&self, param: Param<'_>, value: Value) {
        self.state.lock().out_values.insert(param_key(param), value);
    }

    /// 最近一次查询产生的结果集
    pub fn last_result_set(&self) -> Option<Arc<MockResultSet>> {
        match &self.state.lock().current {
            CurrentResult::Rows(rs) => Some(rs.clone()),
            _ => None,
        }
    }

    pub(crate) fn close_silently(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        if let CurrentResult::Rows(rs) = std::mem::take(&mut state.current) {
            rs.close_silently();
        }
    }

    /// 结果集关闭时的回调，开启 close_on_completion 时随之关闭
    pub(crate) fn on_result_closed(&self) {
        let close = self.state.lock().close_on_completion;
        if close {
            self.state.lock().closed = true;
        }
    }

    fn enter(&self, operation: &'static str, args: Vec<String>) -> SqlResult<()> {
        self.shared.enter(&self.label(), operation, args)
    }

    fn check_open(&self) -> SqlResult<()> {
        if self.state.lock().closed {
            Err(SqlError::Closed(self.label()))
        } else {
            Ok(())
        }
    }

    fn prepared_sql(&self) -> SqlResult<&str> {
        self.sql
            .as_deref()
            .ok_or_else(|| SqlError::FeatureNotSupported(format!("{} 没有预编译 SQL", self.label())))
    }

    fn new_result_set(&self, mut rows: MockRows) -> Arc<MockResultSet> {
        let max_rows = self.state.lock().max_rows;
        if max_rows > 0 {
            rows.rows.truncate(max_rows as usize);
        }
        MockResultSet::new(rows, self.options, self.shared.clone(), Some(self.this.clone()))
    }

    fn replace_current(&self, next: CurrentResult) {
        let previous = std::mem::replace(&mut self.state.lock().current, next);
        if let CurrentResult::Rows(rs) = previous {
            rs.close_silently();
        }
    }

    fn run_query(&self, sql: &str) -> SqlResult<Arc<dyn ResultSet>> {
        let rs = self.new_result_set(self.shared.rows_for(sql));
        self.replace_current(CurrentResult::Rows(rs.clone()));
        Ok(rs)
    }

    fn run_update(&self, sql: &str, keys: &GeneratedKeys) -> SqlResult<i64> {
        if self.shared.is_query(sql) {
            return Err(SqlError::database("07000", 0, format!("查询语句不能作为更新执行: {}", sql)));
        }
        let count = self.shared.update_count_for(sql);
        self.replace_current(CurrentResult::Count(count));
        let mut generated = MockRows::new(&["GENERATED_KEY"]);
        if *keys != GeneratedKeys::NotReturned {
            for _ in 0..count.max(0) {
                generated.rows.push(vec![Value::BigInt(self.shared.next_id() as i64)]);
            }
        }
        self.state.lock().generated = generated;
        Ok(count)
    }

    fn run(&self, sql: &str, keys: &GeneratedKeys) -> SqlResult<bool> {
        if self.shared.is_query(sql) {
            self.run_query(sql)?;
            Ok(true)
        } else {
            self.run_update(sql, keys)?;
            Ok(false)
        }
    }

    fn bind(&self, index: usize, value: Value) -> SqlResult<()> {
        self.check_open()?;
        if index == 0 {
            return Err(SqlError::InvalidArgument("参数序号从 1 开始".to_string()));
        }
        self.state.lock().params.insert(index, value);
        Ok(())
    }

    fn out_value(&self, param: Param<'_>) -> SqlResult<Value> {
        self.check_open()?;
        let key = param_key(param);
        let mut state = self.state.lock();
        if !state.out_registered.contains_key(&key) {
            return Err(SqlError::InvalidArgument(format!("输出参数未注册: {}", key)));
        }
        let value = state.out_values.get(&key).cloned().unwrap_or(Value::Null);
        state.was_null = value.is_null();
        Ok(value)
    }
}

impl Wrapper for MockStatement {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwrap_any(&self, key: TypeKey) -> SqlResult<&dyn Any> {
        self.shared.unwrap_self(&self.label(), self, key)
    }

    fn is_wrapper_for_any(&self, key: TypeKey) -> SqlResult<bool> {
        self.shared.is_self(&self.label(), self, key)
    }
}

impl Statement for MockStatement {
    fn execute_query(&self, sql: &str) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("execute_query", args!(sql))?;
        self.check_open()?;
        self.run_query(sql)
    }

    fn execute_update(&self, sql: &str) -> SqlResult<i64> {
        self.enter("execute_update", args!(sql))?;
        self.check_open()?;
        self.run_update(sql, &GeneratedKeys::NotReturned)
    }

    fn execute_update_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<i64> {
        self.enter("execute_update_with_keys", args!(sql, keys))?;
        self.check_open()?;
        self.run_update(sql, &keys)
    }

    fn execute_large_update(&self, sql: &str) -> SqlResult<u64> {
        self.enter("execute_large_update", args!(sql))?;
        self.check_open()?;
        let count = self.run_update(sql, &GeneratedKeys::NotReturned)?;
        Ok(count.max(0) as u64)
    }

    fn execute(&self, sql: &str) -> SqlResult<bool> {
        self.enter("execute", args!(sql))?;
        self.check_open()?;
        self.run(sql, &GeneratedKeys::NotReturned)
    }

    fn execute_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<bool> {
        self.enter("execute_with_keys", args!(sql, keys))?;
        self.check_open()?;
        self.run(sql, &keys)
    }

    fn close(&self) -> SqlResult<()> {
        self.enter("close", args!())?;
        self.close_silently();
        Ok(())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.enter("is_closed", args!())?;
        Ok(self.state.lock().closed)
    }

    fn max_field_size(&self) -> SqlResult<usize> {
        self.enter("max_field_size", args!())?;
        Ok(self.state.lock().max_field_size)
    }

    fn set_max_field_size(&self, max: usize) -> SqlResult<()> {
        self.enter("set_max_field_size", args!(max))?;
        self.check_open()?;
        self.state.lock().max_field_size = max;
        Ok(())
    }

    fn max_rows(&self) -> SqlResult<u64> {
        self.enter("max_rows", args!())?;
        Ok(self.state.lock().max_rows)
    }

    fn set_max_rows(&self, max: u64) -> SqlResult<()> {
        self.enter("set_max_rows", args!(max))?;
        self.check_open()?;
        self.state.lock().max_rows = max;
        Ok(())
    }

    fn set_escape_processing(&self, enable: bool) -> SqlResult<()> {
        self.enter("set_escape_processing", args!(enable))?;
        self.check_open()?;
        self.state.lock().escape_processing = enable;
        Ok(())
    }

    fn query_timeout(&self) -> SqlResult<Option<Duration>> {
        self.enter("query_timeout", args!())?;
        Ok(self.state.lock().query_timeout)
    }

    fn set_query_timeout(&self, timeout: Option<Duration>) -> SqlResult<()> {
        self.enter("set_query_timeout", args!(timeout))?;
        self.check_open()?;
        self.state.lock().query_timeout = timeout;
        Ok(())
    }

    fn cancel(&self) -> SqlResult<()> {
        self.enter("cancel", args!())?;
        self.check_open()
    }

    fn warnings(&self) -> SqlResult<Vec<Warning>> {
        self.enter("warnings", args!())?;
        Ok(self.state.lock().warnings.clone())
    }

    fn clear_warnings(&self) -> SqlResult<()> {
        self.enter("clear_warnings", args!())?;
        self.state.lock().warnings.clear();
        Ok(())
    }

    fn set_cursor_name(&self, name: &str) -> SqlResult<()> {
        self.enter("set_cursor_name", args!(name))?;
        self.check_open()?;
        self.state.lock().cursor_name = Some(name.to_string());
        Ok(())
    }

    fn result_set(&self) -> SqlResult<Option<Arc<dyn ResultSet>>> {
        self.enter("result_set", args!())?;
        self.check_open()?;
        Ok(match &self.state.lock().current {
            CurrentResult::Rows(rs) => Some(rs.clone() as Arc<dyn ResultSet>),
            _ => None,
        })
    }

    fn update_count(&self) -> SqlResult<Option<i64>> {
        self.enter("update_count", args!())?;
        self.check_open()?;
        Ok(match self.state.lock().current {
            CurrentResult::Count(count) => Some(count),
            _ => None,
        })
    }

    fn more_results(&self) -> SqlResult<bool> {
        self.enter("more_results", args!())?;
        self.check_open()?;
        self.replace_current(CurrentResult::None);
        Ok(false)
    }

    fn more_results_with(&self, current: MoreResults) -> SqlResult<bool> {
        self.enter("more_results_with", args!(current))?;
        self.check_open()?;
        match current {
            MoreResults::KeepCurrent => {
                self.state.lock().current = CurrentResult::None;
            }
            MoreResults::CloseCurrent | MoreResults::CloseAll => {
                self.replace_current(CurrentResult::None);
            }
        }
        Ok(false)
    }

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()> {
        self.enter("set_fetch_direction", args!(direction))?;
        self.check_open()?;
        self.state.lock().fetch_direction = direction;
        Ok(())
    }

    fn fetch_direction(&self) -> SqlResult<FetchDirection> {
        self.enter("fetch_direction", args!())?;
        Ok(self.state.lock().fetch_direction)
    }

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()> {
        self.enter("set_fetch_size", args!(rows))?;
        self.check_open()?;
        self.state.lock().fetch_size = rows;
        Ok(())
    }

    fn fetch_size(&self) -> SqlResult<usize> {
        self.enter("fetch_size", args!())?;
        Ok(self.state.lock().fetch_size)
    }

    fn result_set_concurrency(&self) -> SqlResult<Concurrency> {
        self.enter("result_set_concurrency", args!())?;
        Ok(self.options.concurrency)
    }

    fn result_set_type(&self) -> SqlResult<ResultSetType> {
        self.enter("result_set_type", args!())?;
        Ok(self.options.result_set_type)
    }

    fn result_set_holdability(&self) -> SqlResult<Holdability> {
        self.enter("result_set_holdability", args!())?;
        Ok(self
            .options
            .holdability
            .unwrap_or(Holdability::HoldCursorsOverCommit))
    }

    fn add_batch(&self, sql: &str) -> SqlResult<()> {
        self.enter("add_batch", args!(sql))?;
        self.check_open()?;
        self.state.lock().batch.push(sql.to_string());
        Ok(())
    }

    fn clear_batch(&self) -> SqlResult<()> {
        self.enter("clear_batch", args!())?;
        self.check_open()?;
        self.state.lock().batch.clear();
        Ok(())
    }

    fn execute_batch(&self) -> SqlResult<Vec<i64>> {
        self.enter("execute_batch", args!())?;
        self.check_open()?;
        let batch = std::mem::take(&mut self.state.lock().batch);
        Ok(batch
            .iter()
            .map(|sql| self.shared.update_count_for(sql))
            .collect())
    }

    fn connection(&self) -> SqlResult<Arc<dyn Connection>> {
        self.enter("connection", args!())?;
        self.connection
            .upgrade()
            .map(|conn| conn as Arc<dyn Connection>)
            .ok_or(SqlError::OwnerReleased("connection"))
    }

    fn generated_keys(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("generated_keys", args!())?;
        self.check_open()?;
        let rows = self.state.lock().generated.clone();
        Ok(self.new_result_set(rows))
    }

    fn set_poolable(&self, poolable: bool) -> SqlResult<()> {
        self.enter("set_poolable", args!(poolable))?;
        self.check_open()?;
        self.state.lock().poolable = poolable;
        Ok(())
    }

    fn is_poolable(&self) -> SqlResult<bool> {
        self.enter("is_poolable", args!())?;
        Ok(self.state.lock().poolable)
    }

    fn close_on_completion(&self) -> SqlResult<()> {
        self.enter("close_on_completion", args!())?;
        self.check_open()?;
        self.state.lock().close_on_completion = true;
        Ok(())
    }

    fn is_close_on_completion(&self) -> SqlResult<bool> {
        self.enter("is_close_on_completion", args!())?;
        Ok(self.state.lock().close_on_completion)
    }
}

impl PreparedStatement for MockStatement {
    fn execute_query_prepared(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("execute_query_prepared", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        self.run_query(sql)
    }

    fn execute_update_prepared(&self) -> SqlResult<i64> {
        self.enter("execute_update_prepared", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        self.run_update(sql, &self.keys)
    }

    fn execute_large_update_prepared(&self) -> SqlResult<u64> {
        self.enter("execute_large_update_prepared", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        Ok(self.run_update(sql, &self.keys)?.max(0) as u64)
    }

    fn execute_prepared(&self) -> SqlResult<bool> {
        self.enter("execute_prepared", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        if self.kind == StatementKind::Callable && !self.shared.is_query(sql) {
            self.replace_current(CurrentResult::Count(self.shared.update_count_for(sql)));
            return Ok(false);
        }
        self.run(sql, &self.keys)
    }

    fn add_batch_prepared(&self) -> SqlResult<()> {
        self.enter("add_batch_prepared", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?.to_string();
        self.state.lock().batch.push(sql);
        Ok(())
    }

    fn clear_parameters(&self) -> SqlResult<()> {
        self.enter("clear_parameters", args!())?;
        self.check_open()?;
        let mut state = self.state.lock();
        state.params.clear();
        state.named_params.clear();
        Ok(())
    }

    fn set_value(&self, index: usize, value: Value) -> SqlResult<()> {
        self.enter("set_value", args!(index, value))?;
        self.bind(index, value)
    }

    fn set_null(&self, index: usize, sql_type: SqlType, type_name: Option<&str>) -> SqlResult<()> {
        self.enter("set_null", args!(index, sql_type, type_name))?;
        self.bind(index, Value::Null)
    }

    fn set_bool(&self, index: usize, value: bool) -> SqlResult<()> {
        self.enter("set_bool", args!(index, value))?;
        self.bind(index, Value::Bool(value))
    }

    fn set_i8(&self, index: usize, value: i8) -> SqlResult<()> {
        self.enter("set_i8", args!(index, value))?;
        self.bind(index, Value::TinyInt(value))
    }

    fn set_i16(&self, index: usize, value: i16) -> SqlResult<()> {
        self.enter("set_i16", args!(index, value))?;
        self.bind(index, Value::SmallInt(value))
    }

    fn set_i32(&self, index: usize, value: i32) -> SqlResult<()> {
        self.enter("set_i32", args!(index, value))?;
        self.bind(index, Value::Int(value))
    }

    fn set_i64(&self, index: usize, value: i64) -> SqlResult<()> {
        self.enter("set_i64", args!(index, value))?;
        self.bind(index, Value::BigInt(value))
    }

    fn set_f32(&self, index: usize, value: f32) -> SqlResult<()> {
        self.enter("set_f32", args!(index, value))?;
        self.bind(index, Value::Float(value))
    }

    fn set_f64(&self, index: usize, value: f64) -> SqlResult<()> {
        self.enter("set_f64", args!(index, value))?;
        self.bind(index, Value::Double(value))
    }

    fn set_decimal(&self, index: usize, value: &str) -> SqlResult<()> {
        self.enter("set_decimal", args!(index, value))?;
        self.bind(index, Value::Decimal(value.to_string()))
    }

    fn set_string(&self, index: usize, value: &str) -> SqlResult<()> {
        self.enter("set_string", args!(index, value))?;
        self.bind(index, Value::String(value.to_string()))
    }

    fn set_bytes(&self, index: usize, value: &[u8]) -> SqlResult<()> {
        self.enter("set_bytes", args!(index, value))?;
        self.bind(index, Value::Bytes(value.to_vec()))
    }

    fn set_date(&self, index: usize, value: NaiveDate) -> SqlResult<()> {
        self.enter("set_date", args!(index, value))?;
        self.bind(index, Value::Date(value))
    }

    fn set_time(&self, index: usize, value: NaiveTime) -> SqlResult<()> {
        self.enter("set_time", args!(index, value))?;
        self.bind(index, Value::Time(value))
    }

    fn set_timestamp(&self, index: usize, value: NaiveDateTime) -> SqlResult<()> {
        self.enter("set_timestamp", args!(index, value))?;
        self.bind(index, Value::Timestamp(value))
    }

    fn set_array(&self, index: usize, elements: Vec<Value>) -> SqlResult<()> {
        self.enter("set_array", args!(index, elements))?;
        self.bind(index, Value::Array(elements))
    }

    fn set_binary_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.enter("set_binary_stream", args!(index, length))?;
        let bytes = read_all(reader, length)?;
        self.bind(index, Value::Bytes(bytes))
    }

    fn set_ascii_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.enter("set_ascii_stream", args!(index, length))?;
        let bytes = read_all(reader, length)?;
        self.bind(index, Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn set_character_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.enter("set_character_stream", args!(index, length))?;
        let bytes = read_all(reader, length)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| SqlError::InvalidArgument(format!("字符流不是有效的 UTF-8: {}", e)))?;
        self.bind(index, Value::String(text))
    }

    fn metadata(&self) -> SqlResult<Option<Arc<dyn ResultSetMetaData>>> {
        self.enter("metadata", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        if !self.shared.is_query(sql) {
            return Ok(None);
        }
        let rows = self.shared.rows_for(sql);
        Ok(Some(MockResultSetMetaData::from_rows(&rows)))
    }

    fn parameter_metadata(&self) -> SqlResult<Arc<dyn ParameterMetaData>> {
        self.enter("parameter_metadata", args!())?;
        self.check_open()?;
        let sql = self.prepared_sql()?;
        let out: Vec<usize> = self
            .state
            .lock()
            .out_registered
            .keys()
            .filter_map(|k| k.strip_prefix('#').and_then(|i| i.parse().ok()))
            .collect();
        Ok(MockParameterMetaData::for_sql(sql, &out))
    }
}

impl CallableStatement for MockStatement {
    fn register_out_parameter(&self, param: Param<'_>, sql_type: SqlType) -> SqlResult<()> {
        self.enter("register_out_parameter", args!(param, sql_type))?;
        self.check_open()?;
        self.state
            .lock()
            .out_registered
            .insert(param_key(param), sql_type);
        Ok(())
    }

    fn register_out_parameter_with_scale(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        scale: u32,
    ) -> SqlResult<()> {
        self.enter("register_out_parameter_with_scale", args!(param, sql_type, scale))?;
        self.check_open()?;
        self.state
            .lock()
            .out_registered
            .insert(param_key(param), sql_type);
        Ok(())
    }

    fn register_out_parameter_typed(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        type_name: &str,
    ) -> SqlResult<()> {
        self.enter("register_out_parameter_typed", args!(param, sql_type, type_name))?;
        self.check_open()?;
        self.state
            .lock()
            .out_registered
            .insert(param_key(param), sql_type);
        Ok(())
    }

    fn was_null(&self) -> SqlResult<bool> {
        self.enter("was_null", args!())?;
        Ok(self.state.lock().was_null)
    }

    fn get_value(&self, param: Param<'_>) -> SqlResult<Value> {
        self.enter("get_value", args!(param))?;
        self.out_value(param)
    }

    fn get_string(&self, param: Param<'_>) -> SqlResult<Option<String>> {
        self.enter("get_string", args!(param))?;
        convert(&self.out_value(param)?, "String", Value::as_text)
    }

    fn get_bool(&self, param: Param<'_>) -> SqlResult<Option<bool>> {
        self.enter("get_bool", args!(param))?;
        convert(&self.out_value(param)?, "bool", Value::as_bool)
    }

    fn get_i32(&self, param: Param<'_>) -> SqlResult<Option<i32>> {
        self.enter("get_i32", args!(param))?;
        convert(&self.out_value(param)?, "i32", |v| {
            v.as_i64().and_then(|n| i32::try_from(n).ok())
        })
    }

    fn get_i64(&self, param: Param<'_>) -> SqlResult<Option<i64>> {
        self.enter("get_i64", args!(param))?;
        convert(&self.out_value(param)?, "i64", Value::as_i64)
    }

    fn get_f64(&self, param: Param<'_>) -> SqlResult<Option<f64>> {
        self.enter("get_f64", args!(param))?;
        convert(&self.out_value(param)?, "f64", Value::as_f64)
    }

    fn get_decimal(&self, param: Param<'_>) -> SqlResult<Option<String>> {
        self.enter("get_decimal", args!(param))?;
        convert(&self.out_value(param)?, "decimal", Value::as_text)
    }

    fn get_bytes(&self, param: Param<'_>) -> SqlResult<Option<Vec<u8>>> {
        self.enter("get_bytes", args!(param))?;
        convert(&self.out_value(param)?, "bytes", Value::as_bytes)
    }

    fn get_date(&self, param: Param<'_>) -> SqlResult<Option<NaiveDate>> {
        self.enter("get_date", args!(param))?;
        convert(&self.out_value(param)?, "date", Value::as_date)
    }

    fn get_time(&self, param: Param<'_>) -> SqlResult<Option<NaiveTime>> {
        self.enter("get_time", args!(param))?;
        convert(&self.out_value(param)?, "time", Value::as_time)
    }

    fn get_timestamp(&self, param: Param<'_>) -> SqlResult<Option<NaiveDateTime>> {
        self.enter("get_timestamp", args!(param))?;
        convert(&self.out_value(param)?, "timestamp", Value::as_timestamp)
    }

    fn set_named_value(&self, name: &str, value: Value) -> SqlResult<()> {
        self.enter("set_named_value", args!(name, value))?;
        self.check_open()?;
        self.state
            .lock()
            .named_params
            .insert(name.to_string(), value);
        Ok(())
    }

    fn set_named_null(&self, name: &str, sql_type: SqlType) -> SqlResult<()> {
        self.enter("set_named_null", args!(name, sql_type))?;
        self.check_open()?;
        self.state
            .lock()
            .named_params
            .insert(name.to_string(), Value::Null);
        Ok(())
    }
}
