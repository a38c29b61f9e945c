//! 连接能力接口

use crate::api::core::callable_statement::CallableStatement;
use crate::api::core::metadata::DatabaseMetaData;
use crate::api::core::prepared_statement::PreparedStatement;
use crate::api::core::statement::Statement;
use crate::api::core::wrapper::Wrapper;
use crate::core::{
    GeneratedKeys, Holdability, IsolationLevel, Savepoint, SqlArray, SqlResult, SqlStruct,
    StatementOptions, Value, Warning,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// 数据库连接
///
/// 语句、预编译语句、存储过程调用和数据库元数据都由连接创建，
/// 以 `Arc` 返回，子对象可以持有指向连接的非拥有引用。
pub trait Connection: Wrapper {
    fn create_statement(&self) -> SqlResult<Arc<dyn Statement>>;

    fn create_statement_with(&self, options: StatementOptions) -> SqlResult<Arc<dyn Statement>>;

    fn prepare_statement(&self, sql: &str) -> SqlResult<Arc<dyn PreparedStatement>>;

    fn prepare_statement_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn PreparedStatement>>;

    fn prepare_statement_with_keys(
        &self,
        sql: &str,
        keys: GeneratedKeys,
    ) -> SqlResult<Arc<dyn PreparedStatement>>;

    fn prepare_call(&self, sql: &str) -> SqlResult<Arc<dyn CallableStatement>>;

    fn prepare_call_with(
        &self,
        sql: &str,
        options: StatementOptions,
    ) -> SqlResult<Arc<dyn CallableStatement>>;

    /// 将 SQL 转换为驱动原生语法
    fn native_sql(&self, sql: &str) -> SqlResult<String>;

    fn set_auto_commit(&self, auto_commit: bool) -> SqlResult<()>;

    fn auto_commit(&self) -> SqlResult<bool>;

    fn commit(&self) -> SqlResult<()>;

    fn rollback(&self) -> SqlResult<()>;

    /// 创建保存点，`name` 为 None 时创建未命名保存点
    fn set_savepoint(&self, name: Option<&str>) -> SqlResult<Savepoint>;

    fn rollback_to(&self, savepoint: &Savepoint) -> SqlResult<()>;

    fn release_savepoint(&self, savepoint: &Savepoint) -> SqlResult<()>;

    fn close(&self) -> SqlResult<()>;

    fn is_closed(&self) -> SqlResult<bool>;

    fn metadata(&self) -> SqlResult<Arc<dyn DatabaseMetaData>>;

    fn set_read_only(&self, read_only: bool) -> SqlResult<()>;

    fn is_read_only(&self) -> SqlResult<bool>;

    fn set_catalog(&self, catalog: &str) -> SqlResult<()>;

    fn catalog(&self) -> SqlResult<Option<String>>;

    fn set_schema(&self, schema: &str) -> SqlResult<()>;

    fn schema(&self) -> SqlResult<Option<String>>;

    fn set_transaction_isolation(&self, level: IsolationLevel) -> SqlResult<()>;

    fn transaction_isolation(&self) -> SqlResult<IsolationLevel>;

    fn warnings(&self) -> SqlResult<Vec<Warning>>;

    fn clear_warnings(&self) -> SqlResult<()>;

    fn set_holdability(&self, holdability: Holdability) -> SqlResult<()>;

    fn holdability(&self) -> SqlResult<Holdability>;

    /// 用户自定义类型名到驱动类型名的映射
    fn type_map(&self) -> SqlResult<HashMap<String, String>>;

    fn set_type_map(&self, map: HashMap<String, String>) -> SqlResult<()>;

    fn is_valid(&self, timeout: Duration) -> SqlResult<bool>;

    fn set_client_info(&self, name: &str, value: &str) -> SqlResult<()>;

    fn set_client_info_all(&self, properties: HashMap<String, String>) -> SqlResult<()>;

    fn client_info(&self, name: &str) -> SqlResult<Option<String>>;

    fn client_info_all(&self) -> SqlResult<HashMap<String, String>>;

    fn create_array_of(&self, type_name: &str, elements: Vec<Value>) -> SqlResult<SqlArray>;

    fn create_struct(&self, type_name: &str, attributes: Vec<Value>) -> SqlResult<SqlStruct>;

    fn create_blob(&self) -> SqlResult<Vec<u8>>;

    fn create_clob(&self) -> SqlResult<String>;

    /// 立即终止连接，不等待进行中的操作
    fn abort(&self) -> SqlResult<()>;

    fn set_network_timeout(&self, timeout: Option<Duration>) -> SqlResult<()>;

    fn network_timeout(&self) -> SqlResult<Option<Duration>>;
}
