//! 存储过程调用包装

use crate::api::core::CallableStatement;
use crate::api::delegate::statement::DelegateStatement;
use crate::api::interceptor::Interceptor;
use crate::core::{Param, SqlResult, SqlType, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

impl<S: CallableStatement + ?Sized, I: Interceptor> CallableStatement for DelegateStatement<S, I> {
    fn register_out_parameter(&self, param: Param<'_>, sql_type: SqlType) -> SqlResult<()> {
        self.forward("register_out_parameter", None, || {
            self.delegate().register_out_parameter(param, sql_type)
        })
    }

    fn register_out_parameter_with_scale(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        scale: u32,
    ) -> SqlResult<()> {
        self.forward("register_out_parameter_with_scale", None, || {
            self.delegate()
                .register_out_parameter_with_scale(param, sql_type, scale)
        })
    }

    fn register_out_parameter_typed(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        type_name: &str,
    ) -> SqlResult<()> {
        self.forward("register_out_parameter_typed", None, || {
            self.delegate()
                .register_out_parameter_typed(param, sql_type, type_name)
        })
    }

    fn was_null(&self) -> SqlResult<bool> {
        self.forward("was_null", None, || self.delegate().was_null())
    }

    fn get_value(&self, param: Param<'_>) -> SqlResult<Value> {
        self.forward("get_value", None, || self.delegate().get_value(param))
    }

    fn get_string(&self, param: Param<'_>) -> SqlResult<Option<String>> {
        self.forward("get_string", None, || self.delegate().get_string(param))
    }

    fn get_bool(&self, param: Param<'_>) -> SqlResult<Option<bool>> {
        self.forward("get_bool", None, || self.delegate().get_bool(param))
    }

    fn get_i32(&self, param: Param<'_>) -> SqlResult<Option<i32>> {
        self.forward("get_i32", None, || self.delegate().get_i32(param))
    }

    fn get_i64(&self, param: Param<'_>) -> SqlResult<Option<i64>> {
        self.forward("get_i64", None, || self.delegate().get_i64(param))
    }

    fn get_f64(&self, param: Param<'_>) -> SqlResult<Option<f64>> {
        self.forward("get_f64", None, || self.delegate().get_f64(param))
    }

    fn get_decimal(&self, param: Param<'_>) -> SqlResult<Option<String>> {
        self.forward("get_decimal", None, || self.delegate().get_decimal(param))
    }

    fn get_bytes(&self, param: Param<'_>) -> SqlResult<Option<Vec<u8>>> {
        self.forward("get_bytes", None, || self.delegate().get_bytes(param))
    }

    fn get_date(&self, param: Param<'_>) -> SqlResult<Option<NaiveDate>> {
        self.forward("get_date", None, || self.delegate().get_date(param))
    }

    fn get_time(&self, param: Param<'_>) -> SqlResult<Option<NaiveTime>> {
        self.forward("get_time", None, || self.delegate().get_time(param))
    }

    fn get_timestamp(&self, param: Param<'_>) -> SqlResult<Option<NaiveDateTime>> {
        self.forward("get_timestamp", None, || self.delegate().get_timestamp(param))
    }

    fn set_named_value(&self, name: &str, value: Value) -> SqlResult<()> {
        self.forward("set_named_value", None, || {
            self.delegate().set_named_value(name, value)
        })
    }

    fn set_named_null(&self, name: &str, sql_type: SqlType) -> SqlResult<()> {
        self.forward("set_named_null", None, || {
            self.delegate().set_named_null(name, sql_type)
        })
    }
}
