//! 预编译语句能力接口

use crate::api::core::metadata::{ParameterMetaData, ResultSetMetaData};
use crate::api::core::result_set::ResultSet;
use crate::api::core::statement::Statement;
use crate::core::{SqlResult, SqlType, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::sync::Arc;

/// 预编译语句
///
/// 参数序号从 1 开始。无参数的执行方法带 `_prepared` 后缀，
/// 与 [`Statement`] 上接受 SQL 文本的同名方法区分。
pub trait PreparedStatement: Statement {
    fn execute_query_prepared(&self) -> SqlResult<Arc<dyn ResultSet>>;

    fn execute_update_prepared(&self) -> SqlResult<i64>;

    fn execute_large_update_prepared(&self) -> SqlResult<u64>;

    fn execute_prepared(&self) -> SqlResult<bool>;

    /// 将当前参数组加入批处理
    fn add_batch_prepared(&self) -> SqlResult<()>;

    fn clear_parameters(&self) -> SqlResult<()>;

    fn set_value(&self, index: usize, value: Value) -> SqlResult<()>;

    fn set_null(&self, index: usize, sql_type: SqlType, type_name: Option<&str>) -> SqlResult<()>;

    fn set_bool(&self, index: usize, value: bool) -> SqlResult<()>;

    fn set_i8(&self, index: usize, value: i8) -> SqlResult<()>;

    fn set_i16(&self, index: usize, value: i16) -> SqlResult<()>;

    fn set_i32(&self, index: usize, value: i32) -> SqlResult<()>;

    fn set_i64(&self, index: usize, value: i64) -> SqlResult<()>;

    fn set_f32(&self, index: usize, value: f32) -> SqlResult<()>;

    fn set_f64(&self, index: usize, value: f64) -> SqlResult<()>;

    fn set_decimal(&self, index: usize, value: &str) -> SqlResult<()>;

    fn set_string(&self, index: usize, value: &str) -> SqlResult<()>;

    fn set_bytes(&self, index: usize, value: &[u8]) -> SqlResult<()>;

    fn set_date(&self, index: usize, value: NaiveDate) -> SqlResult<()>;

    fn set_time(&self, index: usize, value: NaiveTime) -> SqlResult<()>;

    fn set_timestamp(&self, index: usize, value: NaiveDateTime) -> SqlResult<()>;

    fn set_array(&self, index: usize, elements: Vec<Value>) -> SqlResult<()>;

    fn set_binary_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()>;

    fn set_ascii_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()>;

    fn set_character_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()>;

    /// 执行前即可得知的结果列描述，驱动无法提前得知时为 None
    fn metadata(&self) -> SqlResult<Option<Arc<dyn ResultSetMetaData>>>;

    fn parameter_metadata(&self) -> SqlResult<Arc<dyn ParameterMetaData>>;
}
