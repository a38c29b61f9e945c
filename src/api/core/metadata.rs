//! 元数据能力接口
//!
//! - [`DatabaseMetaData`]：数据库与驱动的整体描述，目录查询返回结果集
//! - [`ResultSetMetaData`]：结果集列描述
//! - [`ParameterMetaData`]：预编译语句参数描述
//!
//! 目录查询中的 `*_pattern` 参数使用 SQL LIKE 语法，None 表示不过滤。

use crate::api::core::connection::Connection;
use crate::api::core::result_set::ResultSet;
use crate::api::core::wrapper::Wrapper;
use crate::core::{
    Concurrency, Holdability, IsolationLevel, Nullability, ParameterMode, ResultSetType,
    SqlResult, SqlType,
};
use std::sync::Arc;

/// 数据库元数据
pub trait DatabaseMetaData: Wrapper {
    // 产品与驱动信息

    fn database_product_name(&self) -> SqlResult<String>;

    fn database_product_version(&self) -> SqlResult<String>;

    fn database_major_version(&self) -> SqlResult<u32>;

    fn database_minor_version(&self) -> SqlResult<u32>;

    fn driver_name(&self) -> SqlResult<String>;

    fn driver_version(&self) -> SqlResult<String>;

    fn driver_major_version(&self) -> u32;

    fn driver_minor_version(&self) -> u32;

    fn url(&self) -> SqlResult<Option<String>>;

    fn user_name(&self) -> SqlResult<String>;

    fn is_read_only(&self) -> SqlResult<bool>;

    // 语法与术语

    fn identifier_quote_string(&self) -> SqlResult<String>;

    fn sql_keywords(&self) -> SqlResult<Vec<String>>;

    fn catalog_separator(&self) -> SqlResult<String>;

    fn catalog_term(&self) -> SqlResult<String>;

    fn schema_term(&self) -> SqlResult<String>;

    fn procedure_term(&self) -> SqlResult<String>;

    fn search_string_escape(&self) -> SqlResult<String>;

    // 限制，0 表示无限制或未知

    fn max_connections(&self) -> SqlResult<u32>;

    fn max_statement_length(&self) -> SqlResult<u32>;

    fn max_column_name_length(&self) -> SqlResult<u32>;

    fn max_table_name_length(&self) -> SqlResult<u32>;

    // 功能支持

    fn supports_transactions(&self) -> SqlResult<bool>;

    fn supports_transaction_isolation_level(&self, level: IsolationLevel) -> SqlResult<bool>;

    fn default_transaction_isolation(&self) -> SqlResult<IsolationLevel>;

    fn supports_batch_updates(&self) -> SqlResult<bool>;

    fn supports_savepoints(&self) -> SqlResult<bool>;

    fn supports_get_generated_keys(&self) -> SqlResult<bool>;

    fn supports_result_set_type(&self, result_set_type: ResultSetType) -> SqlResult<bool>;

    fn supports_result_set_concurrency(
        &self,
        result_set_type: ResultSetType,
        concurrency: Concurrency,
    ) -> SqlResult<bool>;

    fn supports_result_set_holdability(&self, holdability: Holdability) -> SqlResult<bool>;

    fn result_set_holdability(&self) -> SqlResult<Holdability>;

    fn supports_named_parameters(&self) -> SqlResult<bool>;

    fn supports_multiple_result_sets(&self) -> SqlResult<bool>;

    fn supports_stored_procedures(&self) -> SqlResult<bool>;

    fn supports_outer_joins(&self) -> SqlResult<bool>;

    // 标识符大小写

    fn stores_upper_case_identifiers(&self) -> SqlResult<bool>;

    fn stores_lower_case_identifiers(&self) -> SqlResult<bool>;

    fn stores_mixed_case_identifiers(&self) -> SqlResult<bool>;

    fn supports_mixed_case_identifiers(&self) -> SqlResult<bool>;

    // NULL 排序

    fn nulls_are_sorted_high(&self) -> SqlResult<bool>;

    fn nulls_are_sorted_low(&self) -> SqlResult<bool>;

    fn nulls_are_sorted_at_start(&self) -> SqlResult<bool>;

    fn nulls_are_sorted_at_end(&self) -> SqlResult<bool>;

    // 目录查询

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        procedure_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn schemas(&self) -> SqlResult<Arc<dyn ResultSet>>;

    fn catalogs(&self) -> SqlResult<Arc<dyn ResultSet>>;

    fn table_types(&self) -> SqlResult<Arc<dyn ResultSet>>;

    fn columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique: bool,
        approximate: bool,
    ) -> SqlResult<Arc<dyn ResultSet>>;

    fn type_info(&self) -> SqlResult<Arc<dyn ResultSet>>;

    /// 产生该元数据对象的连接
    fn connection(&self) -> SqlResult<Arc<dyn Connection>>;
}

/// 结果集列描述，列序号从 1 开始
pub trait ResultSetMetaData: Wrapper {
    fn column_count(&self) -> SqlResult<usize>;

    fn column_name(&self, column: usize) -> SqlResult<String>;

    fn column_label(&self, column: usize) -> SqlResult<String>;

    fn column_type(&self, column: usize) -> SqlResult<SqlType>;

    fn column_type_name(&self, column: usize) -> SqlResult<String>;

    fn column_display_size(&self, column: usize) -> SqlResult<u32>;

    fn precision(&self, column: usize) -> SqlResult<u32>;

    fn scale(&self, column: usize) -> SqlResult<u32>;

    fn is_nullable(&self, column: usize) -> SqlResult<Nullability>;

    fn is_auto_increment(&self, column: usize) -> SqlResult<bool>;

    fn is_case_sensitive(&self, column: usize) -> SqlResult<bool>;

    fn is_searchable(&self, column: usize) -> SqlResult<bool>;

    fn is_currency(&self, column: usize) -> SqlResult<bool>;

    fn is_signed(&self, column: usize) -> SqlResult<bool>;

    fn is_read_only(&self, column: usize) -> SqlResult<bool>;

    fn is_writable(&self, column: usize) -> SqlResult<bool>;

    fn table_name(&self, column: usize) -> SqlResult<String>;

    fn schema_name(&self, column: usize) -> SqlResult<String>;

    fn catalog_name(&self, column: usize) -> SqlResult<String>;
}

/// 预编译语句参数描述，参数序号从 1 开始
pub trait ParameterMetaData: Wrapper {
    fn parameter_count(&self) -> SqlResult<usize>;

    fn is_nullable(&self, param: usize) -> SqlResult<Nullability>;

    fn is_signed(&self, param: usize) -> SqlResult<bool>;

    fn precision(&self, param: usize) -> SqlResult<u32>;

    fn scale(&self, param: usize) -> SqlResult<u32>;

    fn parameter_type(&self, param: usize) -> SqlResult<SqlType>;

    fn parameter_type_name(&self, param: usize) -> SqlResult<String>;

    fn parameter_mode(&self, param: usize) -> SqlResult<ParameterMode>;
}
