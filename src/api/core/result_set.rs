//! 结果集能力接口

use crate::api::core::metadata::ResultSetMetaData;
use crate::api::core::statement::Statement;
use crate::api::core::wrapper::Wrapper;
use crate::core::{
    Column, Concurrency, FetchDirection, Holdability, ResultSetType, SqlResult, SqlType, Value,
    Warning,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::sync::Arc;

/// 查询结果集
///
/// 游标初始位于第一行之前。行号从 1 开始，0 表示游标不在任何行上。
/// 类型化读取方法在 SQL NULL 时返回 None。
pub trait ResultSet: Wrapper {
    fn next(&self) -> SqlResult<bool>;

    fn previous(&self) -> SqlResult<bool>;

    fn first(&self) -> SqlResult<bool>;

    fn last(&self) -> SqlResult<bool>;

    fn before_first(&self) -> SqlResult<()>;

    fn after_last(&self) -> SqlResult<()>;

    /// 移动到绝对行号，负数从末尾倒数
    fn absolute(&self, row: i64) -> SqlResult<bool>;

    fn relative(&self, rows: i64) -> SqlResult<bool>;

    fn row(&self) -> SqlResult<usize>;

    fn is_before_first(&self) -> SqlResult<bool>;

    fn is_after_last(&self) -> SqlResult<bool>;

    fn is_first(&self) -> SqlResult<bool>;

    fn is_last(&self) -> SqlResult<bool>;

    fn close(&self) -> SqlResult<()>;

    fn is_closed(&self) -> SqlResult<bool>;

    /// 最近一次读取的列是否为 SQL NULL
    fn was_null(&self) -> SqlResult<bool>;

    fn get_value(&self, column: Column<'_>) -> SqlResult<Value>;

    fn get_string(&self, column: Column<'_>) -> SqlResult<Option<String>>;

    fn get_bool(&self, column: Column<'_>) -> SqlResult<Option<bool>>;

    fn get_i8(&self, column: Column<'_>) -> SqlResult<Option<i8>>;

    fn get_i16(&self, column: Column<'_>) -> SqlResult<Option<i16>>;

    fn get_i32(&self, column: Column<'_>) -> SqlResult<Option<i32>>;

    fn get_i64(&self, column: Column<'_>) -> SqlResult<Option<i64>>;

    fn get_f32(&self, column: Column<'_>) -> SqlResult<Option<f32>>;

    fn get_f64(&self, column: Column<'_>) -> SqlResult<Option<f64>>;

    fn get_decimal(&self, column: Column<'_>) -> SqlResult<Option<String>>;

    fn get_bytes(&self, column: Column<'_>) -> SqlResult<Option<Vec<u8>>>;

    fn get_date(&self, column: Column<'_>) -> SqlResult<Option<NaiveDate>>;

    fn get_time(&self, column: Column<'_>) -> SqlResult<Option<NaiveTime>>;

    fn get_timestamp(&self, column: Column<'_>) -> SqlResult<Option<NaiveDateTime>>;

    fn get_binary_stream(&self, column: Column<'_>) -> SqlResult<Option<Box<dyn Read + Send>>>;

    fn get_character_stream(&self, column: Column<'_>)
        -> SqlResult<Option<Box<dyn Read + Send>>>;

    /// 列标签对应的列序号
    fn find_column(&self, label: &str) -> SqlResult<usize>;

    fn warnings(&self) -> SqlResult<Vec<Warning>>;

    fn clear_warnings(&self) -> SqlResult<()>;

    fn cursor_name(&self) -> SqlResult<String>;

    fn metadata(&self) -> SqlResult<Arc<dyn ResultSetMetaData>>;

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()>;

    fn fetch_direction(&self) -> SqlResult<FetchDirection>;

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()>;

    fn fetch_size(&self) -> SqlResult<usize>;

    fn result_set_type(&self) -> SqlResult<ResultSetType>;

    fn concurrency(&self) -> SqlResult<Concurrency>;

    fn holdability(&self) -> SqlResult<Holdability>;

    fn row_updated(&self) -> SqlResult<bool>;

    fn row_inserted(&self) -> SqlResult<bool>;

    fn row_deleted(&self) -> SqlResult<bool>;

    fn update_value(&self, column: Column<'_>, value: Value) -> SqlResult<()>;

    fn update_null(&self, column: Column<'_>, sql_type: SqlType) -> SqlResult<()>;

    fn insert_row(&self) -> SqlResult<()>;

    fn update_row(&self) -> SqlResult<()>;

    fn delete_row(&self) -> SqlResult<()>;

    fn refresh_row(&self) -> SqlResult<()>;

    fn cancel_row_updates(&self) -> SqlResult<()>;

    fn move_to_insert_row(&self) -> SqlResult<()>;

    fn move_to_current_row(&self) -> SqlResult<()>;

    /// 产生该结果集的语句；由元数据查询产生的结果集为 None
    fn statement(&self) -> SqlResult<Option<Arc<dyn Statement>>>;
}
