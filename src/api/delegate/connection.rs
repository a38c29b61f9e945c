//! 连接包装

use crate::api::core::{
    CallableStatement, Connection, DatabaseMetaData, PreparedStatement, Statement, Wrapper,
};
use crate::api::delegate::metadata::DelegateDatabaseMetaData;
use crate::api::delegate::statement::DelegateStatement;
use crate::api::delegate::unwrap_layered;
use crate::api::interceptor::{Call, Capability, Interceptor, Passthrough};
use crate::core::{
    GeneratedKeys, Holdability, IsolationLevel, Savepoint, SqlArray, SqlResult, SqlStruct,
    StatementOptions, TypeKey, Value, Warning,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// 连接包装
///
/// 所有操作转发给被委托连接；创建语句和元数据的操作返回对应的包装对象，
/// 子包装对象持有指向本包装的非拥有引用，并共享同一个拦截器。
///
/// # 示例
///
/// ```rust,ignore
/// use sql_delegate::api::delegate::DelegateConnection;
/// use sql_delegate::api::interceptor::LoggingInterceptor;
///
/// let conn = DelegateConnection::with_interceptor(raw_connection, LoggingInterceptor::default());
/// let stmt = conn.create_statement()?;
/// let rs = stmt.execute_query("SELECT 1")?;
/// ```
pub struct DelegateConnection<I: Interceptor = Passthrough> {
    delegate: Arc<dyn Connection>,
    interceptor: Arc<I>,
    this: Weak<DelegateConnection<I>>,
}

impl DelegateConnection {
    /// 不带拦截的包装
    pub fn new(delegate: Arc<dyn Connection>) -> Arc<Self> {
        Self::with_interceptor(delegate, Passthrough)
    }
}

impl<I: Interceptor> DelegateConnection<I> {
    pub fn with_interceptor(delegate: Arc<dyn Connection>, interceptor: I) -> Arc<Self> {
        Self::with_shared_interceptor(delegate, Arc::new(interceptor))
    }

    /// 使用已被其他包装共享的拦截器
    pub fn with_shared_interceptor(delegate: Arc<dyn Connection>, interceptor: Arc<I>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            delegate,
            interceptor,
            this: this.clone(),
        })
    }

    /// 被委托的连接
    pub fn delegate(&self) -> &Arc<dyn Connection> {
        &self.delegate
    }

    pub fn interceptor(&self) -> &Arc<I> {
        &self.interceptor
    }

    fn owner(&self) -> Weak<dyn Connection> {
        self.this.clone()
    }

    fn forward<T>(
        &self,
        operation: &'static str,
        sql: Option<&str>,
        proceed: impl FnOnce() -> SqlResult<T>,
    ) -> SqlResult<T> {
        let mut call = Call::new(Capability::Connection, operation);
        call.sql = sql;
        self.interceptor.intercept(&call, proceed)
    }

    fn wrap_statement(&self, raw: Arc<dyn Statement>) -> Arc<dyn Statement> {
        self.interceptor
            .on_child(Capability::Connection, Capability::Statement);
        DelegateStatement::new(
            raw,
            Capability::Statement,
            self.owner(),
            self.interceptor.clone(),
        )
    }

    fn wrap_prepared_statement(&self, raw: Arc<dyn PreparedStatement>) -> Arc<dyn PreparedStatement> {
        self.interceptor
            .on_child(Capability::Connection, Capability::PreparedStatement);
        DelegateStatement::new(
            raw,
            Capability::PreparedStatement,
            self.owner(),
            self.interceptor.clone(),
        )
    }

    fn wrap_callable_statement(&self, raw: Arc<dyn CallableStatement>) -> Arc<dyn CallableStatement> {
        self.interceptor
            .on_child(Capability::Connection, Capability::CallableStatement);
        DelegateStatement::new(
            raw,
            Capability::CallableStatement,
            self.owner(),
            self.interceptor.clone(),
        )
    }

    fn wrap_metadata(&self, raw: Arc<dyn DatabaseMetaData>) -> Arc<dyn DatabaseMetaData> {
        self.interceptor
            .on_child(Capability::Connection, Capability::DatabaseMetaData);
        DelegateDatabaseMetaData::new(raw, self.owner(), self.interceptor.clone())
    }
}

impl<I: Interceptor> Wrapper for DelegateConnection<I> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwrap_any(&self, key: TypeKey) -> SqlResult<&dyn Any> {
        unwrap_layered(self, self.interceptor.as_ref(), key, || {
            self.delegate.unwrap_any(key)
        })
    }

    fn is_wrapper_for_any(&self, key: TypeKey) -> SqlResult<bool> {
        if key.matches(self) || key.matches(self.interceptor.as_ref()) {
            return Ok(true);
        }
        self.delegate.is_wrapper_for_any(key)
    }
}

impl<I: Interceptor> Connection for DelegateConnection<I> {
    fn create_statement(&self) -> SqlResult<Arc<dyn Statement>> {
        self.forward("create_statement", None, || {
            self.delegate
                .create_statement()
                .map(|s| self.wrap_statement(s))
        })
    }

    fn create_statement_with(&self, options: StatementOptions) -> SqlResult<Arc<dyn Statement>> {
        self.forward("create_statement_with", None, || {
            self.delegate
                .create_statement_with(options)
                .map(|s| self.wrap_statement(s))
        })
    }

    fn prepare_statement(&self, sql: &str) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.forward("prepare_statement", Some(sql), || {
            self.delegate
                .prepare_statement(sql)
                .map(|s| self.wrap_prepared_statement(s))
        })
    }

    fn prepare_statement_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.forward("prepare_statement_with", Some(sql), || {
            self.delegate
                .prepare_statement_with(sql, options)
                .map(|s| self.wrap_prepared_statement(s))
        })
    }

    fn prepare_statement_with_keys(
        &self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> SqlResult<Arc<dyn PreparedStatement>> {
        self.forward("prepare_statement_with_keys", Some(sql), || {
            self.delegate
                .prepare_statement_with_keys(sql, keys)
                .map(|s| self.wrap_prepared_statement(s))
        })
    }

    fn prepare_call(&self, sql: &str) -> SqlResult<Arc<dyn CallableStatement>> {
        self.forward("prepare_call", Some(sql), || {
            self.delegate
                .prepare_call(sql)
                .map(|s| self.wrap_callable_statement(s))
        })
    }

    fn prepare_call_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn CallableStatement>> {
        self.forward("prepare_call_with", Some(sql), || {
            self.delegate
                .prepare_call_with(sql, options)
                .map(|s| self.wrap_callable_statement(s))
        })
    }

    fn native_sql(&self, sql: &str) -> SqlResult<String> {
        self.forward("native_sql", Some(sql), || self.delegate.native_sql(sql))
    }

    fn set_auto_commit(&self, auto_commit: bool) -> SqlResult<()> {
        self.forward("set_auto_commit", None, || {
            self.delegate.set_auto_commit(auto_commit)
        })
    }

    fn auto_commit(&self) -> SqlResult<bool> {
        self.forward("auto_commit", None, || self.delegate.auto_commit())
    }

    fn commit(&self) -> SqlResult<()> {
        self.forward("commit", None, || self.delegate.commit())
    }

    fn rollback(&self) -> SqlResult<()> {
        self.forward("rollback", None, || self.delegate.rollback())
    }

    fn set_savepoint(&self, name: Option<&str>) -> SqlResult<Savepoint> {
        self.forward("set_savepoint", None, || self.delegate.set_savepoint(name))
    }

    fn rollback_to(&self, savepoint: &Savepoint) -> SqlResult<()> {
        self.forward("rollback_to", None, || self.delegate.rollback_to(savepoint))
    }

    fn release_savepoint(&self, savepoint: &Savepoint) -> SqlResult<()> {
        self.forward("release_savepoint", None, || {
            self.delegate.release_savepoint(savepoint)
        })
    }

    fn close(&self) -> SqlResult<()> {
        self.forward("close", None, || self.delegate.close())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.forward("is_closed", None, || self.delegate.is_closed())
    }

    fn metadata(&self) -> SqlResult<Arc<dyn DatabaseMetaData>> {
        self.forward("metadata", None, || {
            self.delegate.metadata().map(|m| self.wrap_metadata(m))
        })
    }

    fn set_read_only(&self, read_only: bool) -> SqlResult<()> {
        self.forward("set_read_only", None, || self.delegate.set_read_only(read_only))
    }

    fn is_read_only(&self) -> SqlResult<bool> {
        self.forward("is_read_only", None, || self.delegate.is_read_only())
    }

    fn set_catalog(&self, catalog: &str) -> SqlResult<()> {
        self.forward("set_catalog", None, || self.delegate.set_catalog(catalog))
    }

    fn catalog(&self) -> SqlResult<Option<String>> {
        self.forward("catalog", None, || self.delegate.catalog())
    }

    fn set_schema(&self, schema: &str) -> SqlResult<()> {
        self.forward("set_schema", None, || self.delegate.set_schema(schema))
    }

    fn schema(&self) -> SqlResult<Option<String>> {
        self.forward("schema", None, || self.delegate.schema())
    }

    fn set_transaction_isolation(&self, level: IsolationLevel) -> SqlResult<()> {
        self.forward("set_transaction_isolation", None, || {
            self.delegate.set_transaction_isolation(level)
        })
    }

    fn transaction_isolation(&self) -> SqlResult<IsolationLevel> {
        self.forward("transaction_isolation", None, || {
            self.delegate.transaction_isolation()
        })
    }

    fn warnings(&self) -> SqlResult<Vec<Warning>> {
        self.forward("warnings", None, || self.delegate.warnings())
    }

    fn clear_warnings(&self) -> SqlResult<()> {
        self.forward("clear_warnings", None, || self.delegate.clear_warnings())
    }

    fn set_holdability(&self, holdability: Holdability) -> SqlResult<()> {
        self.forward("set_holdability", None, || {
            self.delegate.set_holdability(holdability)
        })
    }

    fn holdability(&self) -> SqlResult<Holdability> {
        self.forward("holdability", None, || self.delegate.holdability())
    }

    fn type_map(&self) -> SqlResult<HashMap<String, String>> {
        self.forward("type_map", None, || self.delegate.type_map())
    }

    fn set_type_map(&self, map: HashMap<String, String>) -> SqlResult<()> {
        self.forward("set_type_map", None, || self.delegate.set_type_map(map))
    }

    fn is_valid(&self, timeout: Duration) -> SqlResult<bool> {
        self.forward("is_valid", None, || self.delegate.is_valid(timeout))
    }

    fn set_client_info(&self, name: &str, value: &str) -> SqlResult<()> {
        self.forward("set_client_info", None, || {
            self.delegate.set_client_info(name, value)
        })
    }

    fn set_client_info_all(&self, properties: HashMap<String, String>) -> SqlResult<()> {
        self.forward("set_client_info_all", None, || {
            self.delegate.set_client_info_all(properties)
        })
    }

    fn client_info(&self, name: &str) -> SqlResult<Option<String>> {
        self.forward("client_info", None, || self.delegate.client_info(name))
    }

    fn client_info_all(&self) -> SqlResult<HashMap<String, String>> {
        self.forward("client_info_all", None, || self.delegate.client_info_all())
    }

    fn create_array_of(&self, type_name: &str, elements: Vec<Value>) -> SqlResult<SqlArray> {
        self.forward("create_array_of", None, || {
            self.delegate.create_array_of(type_name, elements)
        })
    }

    fn create_struct(&self, type_name: &str, attributes: Vec<Value>) -> SqlResult<SqlStruct> {
        self.forward("create_struct", None, || {
            self.delegate.create_struct(type_name, attributes)
        })
    }

    fn create_blob(&self) -> SqlResult<Vec<u8>> {
        self.forward("create_blob", None, || self.delegate.create_blob())
    }

    fn create_clob(&self) -> SqlResult<String> {
        self.forward("create_clob", None, || self.delegate.create_clob())
    }

    fn abort(&self) -> SqlResult<()> {
        self.forward("abort", None, || self.delegate.abort())
    }

    fn set_network_timeout(&self, timeout: Option<Duration>) -> SqlResult<()> {
        self.forward("set_network_timeout", None, || {
            self.delegate.set_network_timeout(timeout)
        })
    }

    fn network_timeout(&self) -> SqlResult<Option<Duration>> {
        self.forward("network_timeout", None, || self.delegate.network_timeout())
    }
}
