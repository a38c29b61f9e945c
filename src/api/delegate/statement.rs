//! 语句包装
//!
//! 普通语句、预编译语句和存储过程调用共用同一个泛型包装
//! [`DelegateStatement`]，按被委托对象实现的能力分别实现对应接口：
//! 本文件实现 [`Statement`]，预编译和存储过程部分见同目录的其他文件。

use crate::api::core::{Connection, ResultSet, Statement, Wrapper};
use crate::api::delegate::result_set::DelegateResultSet;
use crate::api::delegate::unwrap_layered;
use crate::api::interceptor::{Call, Capability, Interceptor, Passthrough};
use crate::core::{
    Concurrency, FetchDirection, GeneratedKeys, Holdability, MoreResults, ResultSetType,
    SqlError, SqlResult, TypeKey, Warning,
};
use std::any::Any;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// 语句包装
///
/// `S` 是被委托语句的能力类型（`dyn Statement`、`dyn PreparedStatement`
/// 或 `dyn CallableStatement`）。`connection()` 返回创建它的连接包装，
/// 而不是驱动的原始连接。
pub struct DelegateStatement<S: ?Sized, I: Interceptor = Passthrough> {
    delegate: Arc<S>,
    capability: Capability,
    connection: Weak<dyn Connection>,
    interceptor: Arc<I>,
    this: Weak<DelegateStatement<S, I>>,
}

/// 预编译语句包装
pub type DelegatePreparedStatement<I = Passthrough> =
    DelegateStatement<dyn crate::api::core::PreparedStatement, I>;

/// 存储过程调用包装
pub type DelegateCallableStatement<I = Passthrough> =
    DelegateStatement<dyn crate::api::core::CallableStatement, I>;

impl<S: Statement + ?Sized, I: Interceptor> DelegateStatement<S, I> {
    /// 包装一个语句
    ///
    /// # 参数
    /// - `delegate` - 被委托语句
    /// - `capability` - 该语句在拦截器中报告的能力类别
    /// - `connection` - 所属连接包装的非拥有引用
    /// - `interceptor` - 与所属连接共享的拦截器
    pub fn new(
        delegate: Arc<S>,
        capability: Capability,
        connection: Weak<dyn Connection>,
        interceptor: Arc<I>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            delegate,
            capability,
            connection,
            interceptor,
            this: this.clone(),
        })
    }

    /// 被委托的语句
    pub fn delegate(&self) -> &Arc<S> {
        &self.delegate
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn interceptor(&self) -> &Arc<I> {
        &self.interceptor
    }

    pub(crate) fn forward<T>(
        &self,
        operation: &'static str,
        sql: Option<&str>,
        proceed: impl FnOnce() -> SqlResult<T>,
    ) -> SqlResult<T> {
        let mut call = Call::new(self.capability, operation);
        call.sql = sql;
        self.interceptor.intercept(&call, proceed)
    }

    pub(crate) fn wrap_result_set(&self, raw: Arc<dyn ResultSet>) -> Arc<dyn ResultSet> {
        self.interceptor
            .on_child(self.capability, Capability::ResultSet);
        let owner: Weak<dyn Statement> = self.this.clone();
        DelegateResultSet::new(raw, Some(owner), self.interceptor.clone())
    }
}

impl<S: Statement + ?Sized, I: Interceptor> Wrapper for DelegateStatement<S, I> {
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

impl<S: Statement + ?Sized, I: Interceptor> Statement for DelegateStatement<S, I> {
    fn execute_query(&self, sql: &str) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("execute_query", Some(sql), || {
            self.delegate
                .execute_query(sql)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn execute_update(&self, sql: &str) -> SqlResult<i64> {
        self.forward("execute_update", Some(sql), || self.delegate.execute_update(sql))
    }

    fn execute_update_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<i64> {
        self.forward("execute_update_with_keys", Some(sql), || {
            self.delegate.execute_update_with_keys(sql, keys)
        })
    }

    fn execute_large_update(&self, sql: &str) -> SqlResult<u64> {
        self.forward("execute_large_update", Some(sql), || {
            self.delegate.execute_large_update(sql)
        })
    }

    fn execute(&self, sql: &str) -> SqlResult<bool> {
        self.forward("execute", Some(sql), || self.delegate.execute(sql))
    }

    fn execute_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<bool> {
        self.forward("execute_with_keys", Some(sql), || {
            self.delegate.execute_with_keys(sql, keys)
        })
    }

    fn close(&self) -> SqlResult<()> {
        self.forward("close", None, || self.delegate.close())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.forward("is_closed", None, || self.delegate.is_closed())
    }

    fn max_field_size(&self) -> SqlResult<usize> {
        self.forward("max_field_size", None, || self.delegate.max_field_size())
    }

    fn set_max_field_size(&self, max: usize) -> SqlResult<()> {
        self.forward("set_max_field_size", None, || {
            self.delegate.set_max_field_size(max)
        })
    }

    fn max_rows(&self) -> SqlResult<u64> {
        self.forward("max_rows", None, || self.delegate.max_rows())
    }

    fn set_max_rows(&self, max: u64) -> SqlResult<()> {
        self.forward("set_max_rows", None, || self.delegate.set_max_rows(max))
    }

    fn set_escape_processing(&self, enable: bool) -> SqlResult<()> {
        self.forward("set_escape_processing", None, || {
            self.delegate.set_escape_processing(enable)
        })
    }

    fn query_timeout(&self) -> SqlResult<Option<Duration>> {
        self.forward("query_timeout", None, || self.delegate.query_timeout())
    }

    fn set_query_timeout(&self, timeout: Option<Duration>) -> SqlResult<()> {
        self.forward("set_query_timeout", None, || {
            self.delegate.set_query_timeout(timeout)
        })
    }

    fn cancel(&self) -> SqlResult<()> {
        self.forward("cancel", None, || self.delegate.cancel())
    }

    fn warnings(&self) -> SqlResult<Vec<Warning>> {
        self.forward("warnings", None, || self.delegate.warnings())
    }

    fn clear_warnings(&self) -> SqlResult<()> {
        self.forward("clear_warnings", None, || self.delegate.clear_warnings())
    }

    fn set_cursor_name(&self, name: &str) -> SqlResult<()> {
        self.forward("set_cursor_name", None, || self.delegate.set_cursor_name(name))
    }

    fn result_set(&self) -> SqlResult<Option<Arc<dyn ResultSet>>> {
        self.forward("result_set", None, || {
            self.delegate
                .result_set()
                .map(|rs| rs.map(|rs| self.wrap_result_set(rs)))
        })
    }

    fn update_count(&self) -> SqlResult<Option<i64>> {
        self.forward("update_count", None, || self.delegate.update_count())
    }

    fn more_results(&self) -> SqlResult<bool> {
        self.forward("more_results", None, || self.delegate.more_results())
    }

    fn more_results_with(&self, current: MoreResults) -> SqlResult<bool> {
        self.forward("more_results_with", None, || {
            self.delegate.more_results_with(current)
        })
    }

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()> {
        self.forward("set_fetch_direction", None, || {
            self.delegate.set_fetch_direction(direction)
        })
    }

    fn fetch_direction(&self) -> SqlResult<FetchDirection> {
        self.forward("fetch_direction", None, || self.delegate.fetch_direction())
    }

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()> {
        self.forward("set_fetch_size", None, || self.delegate.set_fetch_size(rows))
    }

    fn fetch_size(&self) -> SqlResult<usize> {
        self.forward("fetch_size", None, || self.delegate.fetch_size())
    }

    fn result_set_concurrency(&self) -> SqlResult<Concurrency> {
        self.forward("result_set_concurrency", None, || {
            self.delegate.result_set_concurrency()
        })
    }

    fn result_set_type(&self) -> SqlResult<ResultSetType> {
        self.forward("result_set_type", None, || self.delegate.result_set_type())
    }

    fn result_set_holdability(&self) -> SqlResult<Holdability> {
        self.forward("result_set_holdability", None, || {
            self.delegate.result_set_holdability()
        })
    }

    fn add_batch(&self, sql: &str) -> SqlResult<()> {
        self.forward("add_batch", Some(sql), || self.delegate.add_batch(sql))
    }

    fn clear_batch(&self) -> SqlResult<()> {
        self.forward("clear_batch", None, || self.delegate.clear_batch())
    }

    fn execute_batch(&self) -> SqlResult<Vec<i64>> {
        self.forward("execute_batch", None, || self.delegate.execute_batch())
    }

    fn connection(&self) -> SqlResult<Arc<dyn Connection>> {
        self.forward("connection", None, || {
            self.connection
                .upgrade()
                .ok_or(SqlError::OwnerReleased("connection"))
        })
    }

    fn generated_keys(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("generated_keys", None, || {
            self.delegate
                .generated_keys()
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn set_poolable(&self, poolable: bool) -> SqlResult<()> {
        self.forward("set_poolable", None, || self.delegate.set_poolable(poolable))
    }

    fn is_poolable(&self) -> SqlResult<bool> {
        self.forward("is_poolable", None, || self.delegate.is_poolable())
    }

    fn close_on_completion(&self) -> SqlResult<()> {
        self.forward("close_on_completion", None, || {
            self.delegate.close_on_completion()
        })
    }

    fn is_close_on_completion(&self) -> SqlResult<bool> {
        self.forward("is_close_on_completion", None, || {
            self.delegate.is_close_on_completion()
        })
    }
}
