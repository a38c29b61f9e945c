//! 存储过程调用能力接口

use crate::api::core::prepared_statement::PreparedStatement;
use crate::core::{Param, SqlResult, SqlType, Value};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 存储过程调用语句
///
/// 输出参数须先注册再执行；读取方法在 SQL NULL 时返回 None。
pub trait CallableStatement: PreparedStatement {
    fn register_out_parameter(&self, param: Param<'_>, sql_type: SqlType) -> SqlResult<()>;

    fn register_out_parameter_with_scale(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        scale: u32,
    ) -> SqlResult<()>;

    /// 注册用户自定义类型或引用类型的输出参数
    fn register_out_parameter_typed(
        &self,
        param: Param<'_>,
        sql_type: SqlType,
        type_name: &str,
    ) -> SqlResult<()>;

    /// 最近一次读取的输出参数是否为 SQL NULL
    fn was_null(&self) -> SqlResult<bool>;

    fn get_value(&self, param: Param<'_>) -> SqlResult<Value>;

    fn get_string(&self, param: Param<'_>) -> SqlResult<Option<String>>;

    fn get_bool(&self, param: Param<'_>) -> SqlResult<Option<bool>>;

    fn get_i32(&self, param: Param<'_>) -> SqlResult<Option<i32>>;

    fn get_i64(&self, param: Param<'_>) -> SqlResult<Option<i64>>;

    fn get_f64(&self, param: Param<'_>) -> SqlResult<Option<f64>>;

    fn get_decimal(&self, param: Param<'_>) -> SqlResult<Option<String>>;

    fn get_bytes(&self, param: Param<'_>) -> SqlResult<Option<Vec<u8>>>;

    fn get_date(&self, param: Param<'_>) -> SqlResult<Option<NaiveDate>>;

    fn get_time(&self, param: Param<'_>) -> SqlResult<Option<NaiveTime>>;

    fn get_timestamp(&self, param: Param<'_>) -> SqlResult<Option<NaiveDateTime>>;

    /// 按名称设置输入参数
    fn set_named_value(&self, name: &str, value: Value) -> SqlResult<()>;

    fn set_named_null(&self, name: &str, sql_type: SqlType) -> SqlResult<()>;
}
