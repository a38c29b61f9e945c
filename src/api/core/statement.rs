//! 语句能力接口

use crate::api::core::connection::Connection;
use crate::api::core::result_set::ResultSet;
use crate::api::core::wrapper::Wrapper;
use crate::core::{
    Concurrency, FetchDirection, GeneratedKeys, Holdability, MoreResults, ResultSetType,
    SqlResult, Warning,
};
use std::sync::Arc;
use std::time::Duration;

/// 普通 SQL 语句
///
/// 更新计数使用 `i64`；批量执行中驱动可用负数表示"成功但无计数"等状态。
pub trait Statement: Wrapper {
    fn execute_query(&self, sql: &str) -> SqlResult<Arc<dyn ResultSet>>;

    fn execute_update(&self, sql: &str) -> SqlResult<i64>;

    fn execute_update_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<i64>;

    fn execute_large_update(&self, sql: &str) -> SqlResult<u64>;

    /// 执行任意语句，返回 true 表示第一个结果是结果集
    fn execute(&self, sql: &str) -> SqlResult<bool>;

    fn execute_with_keys(&self, sql: &str, keys: GeneratedKeys) -> SqlResult<bool>;

    fn close(&self) -> SqlResult<()>;

    fn is_closed(&self) -> SqlResult<bool>;

    fn max_field_size(&self) -> SqlResult<usize>;

    fn set_max_field_size(&self, max: usize) -> SqlResult<()>;

    fn max_rows(&self) -> SqlResult<u64>;

    fn set_max_rows(&self, max: u64) -> SqlResult<()>;

    fn set_escape_processing(&self, enable: bool) -> SqlResult<()>;

    /// None 表示不限时
    fn query_timeout(&self) -> SqlResult<Option<Duration>>;

    fn set_query_timeout(&self, timeout: Option<Duration>) -> SqlResult<()>;

    fn cancel(&self) -> SqlResult<()>;

    fn warnings(&self) -> SqlResult<Vec<Warning>>;

    fn clear_warnings(&self) -> SqlResult<()>;

    fn set_cursor_name(&self, name: &str) -> SqlResult<()>;

    /// 当前结果；当前结果是更新计数或已无结果时为 None
    fn result_set(&self) -> SqlResult<Option<Arc<dyn ResultSet>>>;

    /// 当前更新计数；当前结果是结果集或已无结果时为 None
    fn update_count(&self) -> SqlResult<Option<i64>>;

    fn more_results(&self) -> SqlResult<bool>;

    fn more_results_with(&self, current: MoreResults) -> SqlResult<bool>;

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()>;

    fn fetch_direction(&self) -> SqlResult<FetchDirection>;

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()>;

    fn fetch_size(&self) -> SqlResult<usize>;

    fn result_set_concurrency(&self) -> SqlResult<Concurrency>;

    fn result_set_type(&self) -> SqlResult<ResultSetType>;

    fn result_set_holdability(&self) -> SqlResult<Holdability>;

    fn add_batch(&self, sql: &str) -> SqlResult<()>;

    fn clear_batch(&self) -> SqlResult<()>;

    fn execute_batch(&self) -> SqlResult<Vec<i64>>;

    /// 创建该语句的连接
    fn connection(&self) -> SqlResult<Arc<dyn Connection>>;

    fn generated_keys(&self) -> SqlResult<Arc<dyn ResultSet>>;

    fn set_poolable(&self, poolable: bool) -> SqlResult<()>;

    fn is_poolable(&self) -> SqlResult<bool>;

    fn close_on_completion(&self) -> SqlResult<()>;

    fn is_close_on_completion(&self) -> SqlResult<bool>;
}
