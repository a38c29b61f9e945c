//! 内存连接

use crate::api::core::{
    CallableStatement, Connection, DatabaseMetaData, PreparedStatement, Statement, Wrapper,
};
use crate::core::{
    GeneratedKeys, Holdability, IsolationLevel, Savepoint, SqlArray, SqlError, SqlResult,
    SqlStruct, StatementOptions, TypeKey, Value, Warning,
};
use crate::mock::metadata::MockDatabaseMetaData;
use crate::mock::statement::{MockStatement, StatementKind};
use crate::mock::{args, CallLog, MockRows, MockShared};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

#[derive(Debug)]
struct ConnectionState {
    closed: bool,
    auto_commit: bool,
    read_only: bool,
    catalog: Option<String>,
    schema: Option<String>,
    isolation: IsolationLevel,
    holdability: Holdability,
    warnings: Vec<Warning>,
    type_map: HashMap<String, String>,
    client_info: HashMap<String, String>,
    network_timeout: Option<Duration>,
    savepoints: Vec<Savepoint>,
    next_savepoint: i64,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            closed: false,
            auto_commit: true,
            read_only: false,
            catalog: None,
            schema: None,
            isolation: IsolationLevel::ReadCommitted,
            holdability: Holdability::HoldCursorsOverCommit,
            warnings: Vec::new(),
            type_map: HashMap::new(),
            client_info: HashMap::new(),
            network_timeout: None,
            savepoints: Vec::new(),
            next_savepoint: 1,
        }
    }
}

/// 内存连接
///
/// 记录每次调用；语句、元数据等子对象都保存在连接上，测试可以取回
/// 驱动层实际创建的对象并与包装层返回的对象比较。
#[derive(Debug)]
pub struct MockConnection {
    id: u64,
    shared: Arc<MockShared>,
    state: Mutex<ConnectionState>,
    statements: Mutex<Vec<Arc<MockStatement>>>,
    metadata: Mutex<Vec<Arc<MockDatabaseMetaData>>>,
    this: Weak<MockConnection>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        let shared = Arc::new(MockShared::default());
        let id = shared.next_id();
        Arc::new_cyclic(|this| Self {
            id,
            shared,
            state: Mutex::new(ConnectionState::default()),
            statements: Mutex::new(Vec::new()),
            metadata: Mutex::new(Vec::new()),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn label(&self) -> String {
        format!("connection#{}", self.id)
    }

    pub fn shared(&self) -> &Arc<MockShared> {
        &self.shared
    }

    pub fn log(&self) -> &CallLog {
        self.shared.log()
    }

    pub fn register_query(&self, sql: &str, rows: MockRows) {
        self.shared.register_query(sql, rows);
    }

    pub fn register_update(&self, sql: &str, count: i64) {
        self.shared.register_update(sql, count);
    }

    pub fn fail_next(&self, operation: &str, error: SqlError) {
        self.shared.fail_next(operation, error);
    }

    /// 追加一条连接级警告
    pub fn push_warning(&self, message: &str) {
        self.state.lock().warnings.push(Warning {
            message: message.to_string(),
            sql_state: "01000".to_string(),
            vendor_code: 0,
        });
    }

    /// 最近创建的语句（任意种类）
    pub fn last_statement(&self) -> Option<Arc<MockStatement>> {
        self.statements.lock().last().cloned()
    }

    pub fn statements(&self) -> Vec<Arc<MockStatement>> {
        self.statements.lock().clone()
    }

    pub fn last_metadata(&self) -> Option<Arc<MockDatabaseMetaData>> {
        self.metadata.lock().last().cloned()
    }

    pub fn savepoints(&self) -> Vec<Savepoint> {
        self.state.lock().savepoints.clone()
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

    fn new_statement(
        &self,
        kind: StatementKind,
        sql: Option<&str>,
        options: StatementOptions,
        keys: GeneratedKeys,
    ) -> Arc<MockStatement> {
        let stmt = MockStatement::new(
            kind,
            sql.map(str::to_string),
            options,
            keys,
            self.shared.clone(),
            self.this.clone(),
        );
        self.statements.lock().push(stmt.clone());
        stmt
    }

    fn default_options(&self) -> StatementOptions {
        StatementOptions::default().with_holdability(self.state.lock().holdability)
    }
}

impl Wrapper for MockConnection {
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

impl Connection for MockConnection {
    fn create_statement(&self) -> SqlResult<Arc<dyn Statement>> {
        self.enter("create_statement", args!())?;
        self.check_open()?;
        Ok(self.new_statement(
            StatementKind::Plain,
            None,
            self.default_options(),
            GeneratedKeys::NotReturned,
        ))
    }

    fn create_statement_with(&self, options: StatementOptions) -> SqlResult<Arc<dyn Statement>> {
        self.enter("create_statement_with", args!(options))?;
        self.check_open()?;
        Ok(self.new_statement(StatementKind::Plain, None, options, GeneratedKeys::NotReturned))
    }

    fn prepare_statement(&self, sql: &str) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.enter("prepare_statement", args!(sql))?;
        self.check_open()?;
        Ok(self.new_statement(
            StatementKind::Prepared,
            Some(sql),
            self.default_options(),
            GeneratedKeys::NotReturned,
        ))
    }

    fn prepare_statement_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.enter("prepare_statement_with", args!(sql, options))?;
        self.check_open()?;
        Ok(self.new_statement(
            StatementKind::Prepared,
            Some(sql),
            options,
            GeneratedKeys::NotReturned,
        ))
    }

    fn prepare_statement_with_keys(
        &self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.enter("prepare_statement_with_keys", args!(sql, keys))?;
        self.check_open()?;
        Ok(self.new_statement(StatementKind::Prepared, Some(sql), self.default_options(), keys))
    }

    fn prepare_call(&self, sql: &str) -> SqlResult<Arc<dyn CallableStatement>> {
        self.enter("prepare_call", args!(sql))?;
        self.check_open()?;
        Ok(self.new_statement(
            StatementKind::Callable,
            Some(sql),
            self.default_options(),
            GeneratedKeys::NotReturned,
        ))
    }

    fn prepare_call_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn CallableStatement>> {
        self.enter("prepare_call_with", args!(sql, options))?;
        self.check_open()?;
        Ok(self.new_statement(
            StatementKind::Callable,
            Some(sql),
            options,
            GeneratedKeys::NotReturned,
        ))
    }

    fn native_sql(&self, sql: &str) -> SqlResult<String> {
        self.enter("native_sql", args!(sql))?;
        Ok(sql.trim().to_string())
    }

    fn set_auto_commit(&self, auto_commit: bool) -> SqlResult<()> {
        self.enter("set_auto_commit", args!(auto_commit))?;
        self.check_open()?;
        self.state.lock().auto_commit = auto_commit;
        Ok(())
    }

    fn auto_commit(&self) -> SqlResult<bool> {
        self.enter("auto_commit", args!())?;
        Ok(self.state.lock().auto_commit)
    }

    fn commit(&self) -> SqlResult<()> {
        self.enter("commit", args!())?;
        self.check_open()?;
        let mut state = self.state.lock();
        if state.auto_commit {
            return Err(SqlError::database("25000", 0, "自动提交模式下不能提交"));
        }
        state.savepoints.clear();
        Ok(())
    }

    fn rollback(&self) -> SqlResult<()> {
        self.enter("rollback", args!())?;
        self.check_open()?;
        let mut state = self.state.lock();
        if state.auto_commit {
            return Err(SqlError::database("25000", 0, "自动提交模式下不能回滚"));
        }
        state.savepoints.clear();
        Ok(())
    }

    fn set_savepoint(&self, name: Option<&str>) -> SqlResult<Savepoint> {
        self.enter("set_savepoint", args!(name))?;
        self.check_open()?;
        let mut state = self.state.lock();
        if state.auto_commit {
            return Err(SqlError::database("25000", 0, "自动提交模式下不能创建保存点"));
        }
        let savepoint = match name {
            Some(name) => Savepoint::named(name),
            None => {
                let id = state.next_savepoint;
                state.next_savepoint += 1;
                Savepoint::unnamed(id)
            }
        };
        state.savepoints.push(savepoint.clone());
        Ok(savepoint)
    }

    fn rollback_to(&self, savepoint: &Savepoint) -> SqlResult<()> {
        self.enter("rollback_to", args!(savepoint))?;
        self.check_open()?;
        let mut state = self.state.lock();
        let pos = state
            .savepoints
            .iter()
            .position(|s| s == savepoint)
            .ok_or_else(|| SqlError::database("3B001", 0, "保存点不存在"))?;
        state.savepoints.truncate(pos + 1);
        Ok(())
    }

    fn release_savepoint(&self, savepoint: &Savepoint) -> SqlResult<()> {
        self.enter("release_savepoint", args!(savepoint))?;
        self.check_open()?;
        let mut state = self.state.lock();
        let pos = state
            .savepoints
            .iter()
            .position(|s| s == savepoint)
            .ok_or_else(|| SqlError::database("3B001", 0, "保存点不存在"))?;
        state.savepoints.remove(pos);
        Ok(())
    }

    fn close(&self) -> SqlResult<()> {
        self.enter("close", args!())?;
        self.state.lock().closed = true;
        for stmt in self.statements.lock().iter() {
            stmt.close_silently();
        }
        Ok(())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.enter("is_closed", args!())?;
        Ok(self.state.lock().closed)
    }

    fn metadata(&self) -> SqlResult<Arc<dyn DatabaseMetaData>> {
        self.enter("metadata", args!())?;
        self.check_open()?;
        let meta = MockDatabaseMetaData::new(self.shared.clone(), self.this.clone());
        self.metadata.lock().push(meta.clone());
        Ok(meta)
    }

    fn set_read_only(&self, read_only: bool) -> SqlResult<()> {
        self.enter("set_read_only", args!(read_only))?;
        self.check_open()?;
        self.state.lock().read_only = read_only;
        Ok(())
    }

    fn is_read_only(&self) -> SqlResult<bool> {
        self.enter("is_read_only", args!())?;
        Ok(self.state.lock().read_only)
    }

    fn set_catalog(&self, catalog: &str) -> SqlResult<()> {
        self.enter("set_catalog", args!(catalog))?;
        self.check_open()?;
        self.state.lock().catalog = Some(catalog.to_string());
        Ok(())
    }

    fn catalog(&self) -> SqlResult<Option<String>> {
        self.enter("catalog", args!())?;
        Ok(self.state.lock().catalog.clone())
    }

    fn set_schema(&self, schema: &str) -> SqlResult<()> {
        self.enter("set_schema", args!(schema))?;
        self.check_open()?;
        self.state.lock().schema = Some(schema.to_string());
        Ok(())
    }

    fn schema(&self) -> SqlResult<Option<String>> {
        self.enter("schema", args!())?;
        Ok(self.state.lock().schema.clone())
    }

    fn set_transaction_isolation(&self, level: IsolationLevel) -> SqlResult<()> {
        self.enter("set_transaction_isolation", args!(level))?;
        self.check_open()?;
        if level == IsolationLevel::None {
            return Err(SqlError::InvalidArgument("隔离级别不能为 None".to_string()));
        }
        self.state.lock().isolation = level;
        Ok(())
    }

    fn transaction_isolation(&self) -> SqlResult<IsolationLevel> {
        self.enter("transaction_isolation", args!())?;
        Ok(self.state.lock().isolation)
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

    fn set_holdability(&self, holdability: Holdability) -> SqlResult<()> {
        self.enter("set_holdability", args!(holdability))?;
        self.check_open()?;
        self.state.lock().holdability = holdability;
        Ok(())
    }

    fn holdability(&self) -> SqlResult<Holdability> {
        self.enter("holdability", args!())?;
        Ok(self.state.lock().holdability)
    }

    fn type_map(&self) -> SqlResult<HashMap<String, String>> {
        self.enter("type_map", args!())?;
        Ok(self.state.lock().type_map.clone())
    }

    fn set_type_map(&self, map: HashMap<String, String>) -> SqlResult<()> {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();
        self.enter("set_type_map", args!(keys))?;
        self.state.lock().type_map = map;
        Ok(())
    }

    fn is_valid(&self, timeout: Duration) -> SqlResult<bool> {
        self.enter("is_valid", args!(timeout))?;
        Ok(!self.state.lock().closed)
    }

    fn set_client_info(&self, name: &str, value: &str) -> SqlResult<()> {
        self.enter("set_client_info", args!(name, value))?;
        if self.state.lock().closed {
            return Err(SqlError::ClientInfo {
                failed: vec![name.to_string()],
            });
        }
        self.state
            .lock()
            .client_info
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_client_info_all(&self, properties: HashMap<String, String>) -> SqlResult<()> {
        let mut names: Vec<String> = properties.keys().cloned().collect();
        names.sort();
        self.enter("set_client_info_all", args!(names))?;
        let mut state = self.state.lock();
        if state.closed {
            return Err(SqlError::ClientInfo { failed: names });
        }
        state.client_info = properties;
        Ok(())
    }

    fn client_info(&self, name: &str) -> SqlResult<Option<String>> {
        self.enter("client_info", args!(name))?;
        Ok(self.state.lock().client_info.get(name).cloned())
    }

    fn client_info_all(&self) -> SqlResult<HashMap<String, String>> {
        self.enter("client_info_all", args!())?;
        Ok(self.state.lock().client_info.clone())
    }

    fn create_array_of(&self, type_name: &str, elements: Vec<Value>) -> SqlResult<SqlArray> {
        self.enter("create_array_of", args!(type_name, elements))?;
        self.check_open()?;
        Ok(SqlArray {
            base_type_name: type_name.to_string(),
            elements,
        })
    }

    fn create_struct(&self, type_name: &str, attributes: Vec<Value>) -> SqlResult<SqlStruct> {
        self.enter("create_struct", args!(type_name, attributes))?;
        self.check_open()?;
        Ok(SqlStruct {
            type_name: type_name.to_string(),
            attributes,
        })
    }

    fn create_blob(&self) -> SqlResult<Vec<u8>> {
        self.enter("create_blob", args!())?;
        self.check_open()?;
        Ok(Vec::new())
    }

    fn create_clob(&self) -> SqlResult<String> {
        self.enter("create_clob", args!())?;
        self.check_open()?;
        Ok(String::new())
    }

    fn abort(&self) -> SqlResult<()> {
        self.enter("abort", args!())?;
        self.state.lock().closed = true;
        Ok(())
    }

    fn set_network_timeout(&self, timeout: Option<Duration>) -> SqlResult<()> {
        self.enter("set_network_timeout", args!(timeout))?;
        self.check_open()?;
        self.state.lock().network_timeout = timeout;
        Ok(())
    }

    fn network_timeout(&self) -> SqlResult<Option<Duration>> {
        self.enter("network_timeout", args!())?;
        Ok(self.state.lock().network_timeout)
    }
}
