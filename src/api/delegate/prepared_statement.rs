//! 预编译语句包装

use crate::api::core::{ParameterMetaData, PreparedStatement, ResultSet, ResultSetMetaData};
use crate::api::delegate::statement::DelegateStatement;
use crate::api::interceptor::Interceptor;
use crate::core::{SqlResult, SqlType, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::sync::Arc;

// 结果集和参数元数据不包装，原样返回
impl<S: PreparedStatement + ?Sized, I: Interceptor> PreparedStatement for DelegateStatement<S, I> {
    fn execute_query_prepared(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("execute_query_prepared", None, || {
            self.delegate()
                .execute_query_prepared()
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn execute_update_prepared(&self) -> SqlResult<i64> {
        self.forward("execute_update_prepared", None, || {
            self.delegate().execute_update_prepared()
        })
    }

    fn execute_large_update_prepared(&self) -> SqlResult<u64> {
        self.forward("execute_large_update_prepared", None, || {
            self.delegate().execute_large_update_prepared()
        })
    }

    fn execute_prepared(&self) -> SqlResult<bool> {
        self.forward("execute_prepared", None, || self.delegate().execute_prepared())
    }

    fn add_batch_prepared(&self) -> SqlResult<()> {
        self.forward("add_batch_prepared", None, || {
            self.delegate().add_batch_prepared()
        })
    }

    fn clear_parameters(&self) -> SqlResult<()> {
        self.forward("clear_parameters", None, || self.delegate().clear_parameters())
    }

    fn set_value(&self, index: usize, value: Value) -> SqlResult<()> {
        self.forward("set_value", None, || self.delegate().set_value(index, value))
    }

    fn set_null(&self, index: usize, sql_type: SqlType, type_name: Option<&str>) -> SqlResult<()> {
        self.forward("set_null", None, || {
            self.delegate().set_null(index, sql_type, type_name)
        })
    }

    fn set_bool(&self, index: usize, value: bool) -> SqlResult<()> {
        self.forward("set_bool", None, || self.delegate().set_bool(index, value))
    }

    fn set_i8(&self, index: usize, value: i8) -> SqlResult<()> {
        self.forward("set_i8", None, || self.delegate().set_i8(index, value))
    }

    fn set_i16(&self, index: usize, value: i16) -> SqlResult<()> {
        self.forward("set_i16", None, || self.delegate().set_i16(index, value))
    }

    fn set_i32(&self, index: usize, value: i32) -> SqlResult<()> {
        self.forward("set_i32", None, || self.delegate().set_i32(index, value))
    }

    fn set_i64(&self, index: usize, value: i64) -> SqlResult<()> {
        self.forward("set_i64", None, || self.delegate().set_i64(index, value))
    }

    fn set_f32(&self, index: usize, value: f32) -> SqlResult<()> {
        self.forward("set_f32", None, || self.delegate().set_f32(index, value))
    }

    fn set_f64(&self, index: usize, value: f64) -> SqlResult<()> {
        self.forward("set_f64", None, || self.delegate().set_f64(index, value))
    }

    fn set_decimal(&self, index: usize, value: &str) -> SqlResult<()> {
        self.forward("set_decimal", None, || self.delegate().set_decimal(index, value))
    }

    fn set_string(&self, index: usize, value: &str) -> SqlResult<()> {
        self.forward("set_string", None, || self.delegate().set_string(index, value))
    }

    fn set_bytes(&self, index: usize, value: &[u8]) -> SqlResult<()> {
        self.forward("set_bytes", None, || self.delegate().set_bytes(index, value))
    }

    fn set_date(&self, index: usize, value: NaiveDate) -> SqlResult<()> {
        self.forward("set_date", None, || self.delegate().set_date(index, value))
    }

    fn set_time(&self, index: usize, value: NaiveTime) -> SqlResult<()> {
        self.forward("set_time", None, || self.delegate().set_time(index, value))
    }

    fn set_timestamp(&self, index: usize, value: NaiveDateTime) -> SqlResult<()> {
        self.forward("set_timestamp", None, || {
            self.delegate().set_timestamp(index, value)
        })
    }

    fn set_array(&self, index: usize, elements: Vec<Value>) -> SqlResult<()> {
        self.forward("set_array", None, || self.delegate().set_array(index, elements))
    }

    fn set_binary_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.forward("set_binary_stream", None, || {
            self.delegate().set_binary_stream(index, reader, length)
        })
    }

    fn set_ascii_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.forward("set_ascii_stream", None, || {
            self.delegate().set_ascii_stream(index, reader, length)
        })
    }

    fn set_character_stream(
        &self,
        index: usize,
        reader: Box<dyn Read + Send>,
        length: Option<u64>,
    ) -> SqlResult<()> {
        self.forward("set_character_stream", None, || {
            self.delegate().set_character_stream(index, reader, length)
        })
    }

    fn metadata(&self) -> SqlResult<Option<Arc<dyn ResultSetMetaData>>> {
        self.forward("metadata", None, || self.delegate().metadata())
    }

    fn parameter_metadata(&self) -> SqlResult<Arc<dyn ParameterMetaData>> {
        self.forward("parameter_metadata", None, || {
            self.delegate().parameter_metadata()
        })
    }
}
