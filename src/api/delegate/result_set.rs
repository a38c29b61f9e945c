//! 结果集包装

use crate::api::core::{ResultSet, ResultSetMetaData, Statement, Wrapper};
use crate::api::delegate::unwrap_layered;
use crate::api::interceptor::{Call, Capability, Interceptor, Passthrough};
use crate::core::{
    Column, Concurrency, FetchDirection, Holdability, ResultSetType, SqlError, SqlResult,
    SqlType, TypeKey, Value, Warning,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::any::Any;
use std::io::Read;
use std::sync::{Arc, Weak};

/// 结果集包装
///
/// 由语句包装产生时持有指向该语句包装的非拥有引用；
/// 由数据库元数据产生时没有所属语句，`statement()` 返回 None。
pub struct DelegateResultSet<I: Interceptor = Passthrough> {
    delegate: Arc<dyn ResultSet>,
    statement: Option<Weak<dyn Statement>>,
    interceptor: Arc<I>,
}

impl<I: Interceptor> DelegateResultSet<I> {
    pub fn new(
        delegate: Arc<dyn ResultSet>,
        statement: Option<Weak<dyn Statement>>,
        interceptor: Arc<I>,
    ) -> Arc<Self> {
        Arc::new(Self {
            delegate,
            statement,
            interceptor,
        })
    }

    /// 被委托的结果集
    pub fn delegate(&self) -> &Arc<dyn ResultSet> {
        &self.delegate
    }

    pub fn interceptor(&self) -> &Arc<I> {
        &self.interceptor
    }

    fn forward<T>(&self, operation: &'static str, proceed: impl FnOnce() -> SqlResult<T>) -> SqlResult<T> {
        self.interceptor
            .intercept(&Call::new(Capability::ResultSet, operation), proceed)
    }
}

impl<I: Interceptor> Wrapper for DelegateResultSet<I> {
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

impl<I: Interceptor> ResultSet for DelegateResultSet<I> {
    fn next(&self) -> SqlResult<bool> {
        self.forward("next", || self.delegate.next())
    }

    fn previous(&self) -> SqlResult<bool> {
        self.forward("previous", || self.delegate.previous())
    }

    fn first(&self) -> SqlResult<bool> {
        self.forward("first", || self.delegate.first())
    }

    fn last(&self) -> SqlResult<bool> {
        self.forward("last", || self.delegate.last())
    }

    fn before_first(&self) -> SqlResult<()> {
        self.forward("before_first", || self.delegate.before_first())
    }

    fn after_last(&self) -> SqlResult<()> {
        self.forward("after_last", || self.delegate.after_last())
    }

    fn absolute(&self, row: i64) -> SqlResult<bool> {
        self.forward("absolute", || self.delegate.absolute(row))
    }

    fn relative(&self, rows: i64) -> SqlResult<bool> {
        self.forward("relative", || self.delegate.relative(rows))
    }

    fn row(&self) -> SqlResult<usize> {
        self.forward("row", || self.delegate.row())
    }

    fn is_before_first(&self) -> SqlResult<bool> {
        self.forward("is_before_first", || self.delegate.is_before_first())
    }

    fn is_after_last(&self) -> SqlResult<bool> {
        self.forward("is_after_last", || self.delegate.is_after_last())
    }

    fn is_first(&self) -> SqlResult<bool> {
        self.forward("is_first", || self.delegate.is_first())
    }

    fn is_last(&self) -> SqlResult<bool> {
        self.forward("is_last", || self.delegate.is_last())
    }

    fn close(&self) -> SqlResult<()> {
        self.forward("close", || self.delegate.close())
    }

    fn is_closed(&self) -> SqlResult<bool> {
        self.forward("is_closed", || self.delegate.is_closed())
    }

    fn was_null(&self) -> SqlResult<bool> {
        self.forward("was_null", || self.delegate.was_null())
    }

    fn get_value(&self, column: Column<'_>) -> SqlResult<Value> {
        self.forward("get_value", || self.delegate.get_value(column))
    }

    fn get_string(&self, column: Column<'_>) -> SqlResult<Option<String>> {
        self.forward("get_string", || self.delegate.get_string(column))
    }

    fn get_bool(&self, column: Column<'_>) -> SqlResult<Option<bool>> {
        self.forward("get_bool", || self.delegate.get_bool(column))
    }

    fn get_i8(&self, column: Column<'_>) -> SqlResult<Option<i8>> {
        self.forward("get_i8", || self.delegate.get_i8(column))
    }

    fn get_i16(&self, column: Column<'_>) -> SqlResult<Option<i16>> {
        self.forward("get_i16", || self.delegate.get_i16(column))
    }

    fn get_i32(&self, column: Column<'_>) -> SqlResult<Option<i32>> {
        self.forward("get_i32", || self.delegate.get_i32(column))
    }

    fn get_i64(&self, column: Column<'_>) -> SqlResult<Option<i64>> {
        self.forward("get_i64", || self.delegate.get_i64(column))
    }

    fn get_f32(&self, column: Column<'_>) -> SqlResult<Option<f32>> {
        self.forward("get_f32", || self.delegate.get_f32(column))
    }

    fn get_f64(&self, column: Column<'_>) -> SqlResult<Option<f64>> {
        self.forward("get_f64", || self.delegate.get_f64(column))
    }

    fn get_decimal(&self, column: Column<'_>) -> SqlResult<Option<String>> {
        self.forward("get_decimal", || self.delegate.get_decimal(column))
    }

    fn get_bytes(&self, column: Column<'_>) -> SqlResult<Option<Vec<u8>>> {
        self.forward("get_bytes", || self.delegate.get_bytes(column))
    }

    fn get_date(&self, column: Column<'_>) -> SqlResult<Option<NaiveDate>> {
        self.forward("get_date", || self.delegate.get_date(column))
    }

    fn get_time(&self, column: Column<'_>) -> SqlResult<Option<NaiveTime>> {
        self.forward("get_time", || self.delegate.get_time(column))
    }

    fn get_timestamp(&self, column: Column<'_>) -> SqlResult<Option<NaiveDateTime>> {
        self.forward("get_timestamp", || self.delegate.get_timestamp(column))
    }

    fn get_binary_stream(&self, column: Column<'_>) -> SqlResult<Option<Box<dyn Read + Send>>> {
        self.forward("get_binary_stream", || self.delegate.get_binary_stream(column))
    }

    fn get_character_stream(
        &self,
        column: Column<'_>,
    ) -> SqlResult<Option<Box<dyn Read + Send>>> {
        self.forward("get_character_stream", || {
            self.delegate.get_character_stream(column)
        })
    }

    fn find_column(&self, label: &str) -> SqlResult<usize> {
        self.forward("find_column", || self.delegate.find_column(label))
    }

    fn warnings(&self) -> SqlResult<Vec<Warning>> {
        self.forward("warnings", || self.delegate.warnings())
    }

    fn clear_warnings(&self) -> SqlResult<()> {
        self.forward("clear_warnings", || self.delegate.clear_warnings())
    }

    fn cursor_name(&self) -> SqlResult<String> {
        self.forward("cursor_name", || self.delegate.cursor_name())
    }

    fn metadata(&self) -> SqlResult<Arc<dyn ResultSetMetaData>> {
        self.forward("metadata", || self.delegate.metadata())
    }

    fn set_fetch_direction(&self, direction: FetchDirection) -> SqlResult<()> {
        self.forward("set_fetch_direction", || {
            self.delegate.set_fetch_direction(direction)
        })
    }

    fn fetch_direction(&self) -> SqlResult<FetchDirection> {
        self.forward("fetch_direction", || self.delegate.fetch_direction())
    }

    fn set_fetch_size(&self, rows: usize) -> SqlResult<()> {
        self.forward("set_fetch_size", || self.delegate.set_fetch_size(rows))
    }

    fn fetch_size(&self) -> SqlResult<usize> {
        self.forward("fetch_size", || self.delegate.fetch_size())
    }

    fn result_set_type(&self) -> SqlResult<ResultSetType> {
        self.forward("result_set_type", || self.delegate.result_set_type())
    }

    fn concurrency(&self) -> SqlResult<Concurrency> {
        self.forward("concurrency", || self.delegate.concurrency())
    }

    fn holdability(&self) -> SqlResult<Holdability> {
        self.forward("holdability", || self.delegate.holdability())
    }

    fn row_updated(&self) -> SqlResult<bool> {
        self.forward("row_updated", || self.delegate.row_updated())
    }

    fn row_inserted(&self) -> SqlResult<bool> {
        self.forward("row_inserted", || self.delegate.row_inserted())
    }

    fn row_deleted(&self) -> SqlResult<bool> {
        self.forward("row_deleted", || self.delegate.row_deleted())
    }

    fn update_value(&self, column: Column<'_>, value: Value) -> SqlResult<()> {
        self.forward("update_value", || self.delegate.update_value(column, value))
    }

    fn update_null(&self, column: Column<'_>, sql_type: SqlType) -> SqlResult<()> {
        self.forward("update_null", || self.delegate.update_null(column, sql_type))
    }

    fn insert_row(&self) -> SqlResult<()> {
        self.forward("insert_row", || self.delegate.insert_row())
    }

    fn update_row(&self) -> SqlResult<()> {
        self.forward("update_row", || self.delegate.update_row())
    }

    fn delete_row(&self) -> SqlResult<()> {
        self.forward("delete_row", || self.delegate.delete_row())
    }

    fn refresh_row(&self) -> SqlResult<()> {
        self.forward("refresh_row", || self.delegate.refresh_row())
    }

    fn cancel_row_updates(&self) -> SqlResult<()> {
        self.forward("cancel_row_updates", || self.delegate.cancel_row_updates())
    }

    fn move_to_insert_row(&self) -> SqlResult<()> {
        self.forward("move_to_insert_row", || self.delegate.move_to_insert_row())
    }

    fn move_to_current_row(&self) -> SqlResult<()> {
        self.forward("move_to_current_row", || self.delegate.move_to_current_row())
    }

    fn statement(&self) -> SqlResult<Option<Arc<dyn Statement>>> {
        self.forward("statement", || match &self.statement {
            Some(owner) => owner
                .upgrade()
                .map(Some)
                .ok_or(SqlError::OwnerReleased("statement")),
            None => Ok(None),
        })
    }
}
