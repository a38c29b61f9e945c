//! 数据库元数据包装

use crate::api::core::{Connection, DatabaseMetaData, ResultSet, Wrapper};
use crate::api::delegate::result_set::DelegateResultSet;
use crate::api::delegate::unwrap_layered;
use crate::api::interceptor::{Call, Capability, Interceptor, Passthrough};
use crate::core::{
    Concurrency, Holdability, IsolationLevel, ResultSetType, SqlError, SqlResult, TypeKey,
};
use std::any::Any;
use std::sync::{Arc, Weak};

/// 数据库元数据包装
///
/// 目录查询返回的结果集被包装，但没有所属语句。
pub struct DelegateDatabaseMetaData<I: Interceptor = Passthrough> {
    delegate: Arc<dyn DatabaseMetaData>,
    connection: Weak<dyn Connection>,
    interceptor: Arc<I>,
}

impl<I: Interceptor> DelegateDatabaseMetaData<I> {
    pub fn new(
        delegate: Arc<dyn DatabaseMetaData>,
        connection: Weak<dyn Connection>,
        interceptor: Arc<I>,
    ) -> Arc<Self> {
        Arc::new(Self {
            delegate,
            connection,
            interceptor,
        })
    }

    pub fn delegate(&self) -> &Arc<dyn DatabaseMetaData> {
        &self.delegate
    }

    pub fn interceptor(&self) -> &Arc<I> {
        &self.interceptor
    }

    fn forward<T>(&self, operation: &'static str, proceed: impl FnOnce() -> SqlResult<T>) -> SqlResult<T> {
        self.interceptor
            .intercept(&Call::new(Capability::DatabaseMetaData, operation), proceed)
    }

    fn wrap_result_set(&self, raw: Arc<dyn ResultSet>) -> Arc<dyn ResultSet> {
        self.interceptor
            .on_child(Capability::DatabaseMetaData, Capability::ResultSet);
        DelegateResultSet::new(raw, None, self.interceptor.clone())
    }
}

impl<I: Interceptor> Wrapper for DelegateDatabaseMetaData<I> {
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

impl<I: Interceptor> DatabaseMetaData for DelegateDatabaseMetaData<I> {
    fn database_product_name(&self) -> SqlResult<String> {
        self.forward("database_product_name", || self.delegate.database_product_name())
    }

    fn database_product_version(&self) -> SqlResult<String> {
        self.forward("database_product_version", || {
            self.delegate.database_product_version()
        })
    }

    fn database_major_version(&self) -> SqlResult<u32> {
        self.forward("database_major_version", || {
            self.delegate.database_major_version()
        })
    }

    fn database_minor_version(&self) -> SqlResult<u32> {
        self.forward("database_minor_version", || {
            self.delegate.database_minor_version()
        })
    }

    fn driver_name(&self) -> SqlResult<String> {
        self.forward("driver_name", || self.delegate.driver_name())
    }

    fn driver_version(&self) -> SqlResult<String> {
        self.forward("driver_version", || self.delegate.driver_version())
    }

    // 不可失败的查询不经过拦截器
    fn driver_major_version(&self) -> u32 {
        self.delegate.driver_major_version()
    }

    fn driver_minor_version(&self) -> u32 {
        self.delegate.driver_minor_version()
    }

    fn url(&self) -> SqlResult<Option<String>> {
        self.forward("url", || self.delegate.url())
    }

    fn user_name(&self) -> SqlResult<String> {
        self.forward("user_name", || self.delegate.user_name())
    }

    fn is_read_only(&self) -> SqlResult<bool> {
        self.forward("is_read_only", || self.delegate.is_read_only())
    }

    fn identifier_quote_string(&self) -> SqlResult<String> {
        self.forward("identifier_quote_string", || {
            self.delegate.identifier_quote_string()
        })
    }

    fn sql_keywords(&self) -> SqlResult<Vec<String>> {
        self.forward("sql_keywords", || self.delegate.sql_keywords())
    }

    fn catalog_separator(&self) -> SqlResult<String> {
        self.forward("catalog_separator", || self.delegate.catalog_separator())
    }

    fn catalog_term(&self) -> SqlResult<String> {
        self.forward("catalog_term", || self.delegate.catalog_term())
    }

    fn schema_term(&self) -> SqlResult<String> {
        self.forward("schema_term", || self.delegate.schema_term())
    }

    fn procedure_term(&self) -> SqlResult<String> {
        self.forward("procedure_term", || self.delegate.procedure_term())
    }

    fn search_string_escape(&self) -> SqlResult<String> {
        self.forward("search_string_escape", || self.delegate.search_string_escape())
    }

    fn max_connections(&self) -> SqlResult<u32> {
        self.forward("max_connections", || self.delegate.max_connections())
    }

    fn max_statement_length(&self) -> SqlResult<u32> {
        self.forward("max_statement_length", || self.delegate.max_statement_length())
    }

    fn max_column_name_length(&self) -> SqlResult<u32> {
        self.forward("max_column_name_length", || {
            self.delegate.max_column_name_length()
        })
    }

    fn max_table_name_length(&self) -> SqlResult<u32> {
        self.forward("max_table_name_length", || {
            self.delegate.max_table_name_length()
        })
    }

    fn supports_transactions(&self) -> SqlResult<bool> {
        self.forward("supports_transactions", || self.delegate.supports_transactions())
    }

    fn supports_transaction_isolation_level(&self, level: IsolationLevel) -> SqlResult<bool> {
        self.forward("supports_transaction_isolation_level", || {
            self.delegate.supports_transaction_isolation_level(level)
        })
    }

    fn default_transaction_isolation(&self) -> SqlResult<IsolationLevel> {
        self.forward("default_transaction_isolation", || {
            self.delegate.default_transaction_isolation()
        })
    }

    fn supports_batch_updates(&self) -> SqlResult<bool> {
        self.forward("supports_batch_updates", || {
            self.delegate.supports_batch_updates()
        })
    }

    fn supports_savepoints(&self) -> SqlResult<bool> {
        self.forward("supports_savepoints", || self.delegate.supports_savepoints())
    }

    fn supports_get_generated_keys(&self) -> SqlResult<bool> {
        self.forward("supports_get_generated_keys", || {
            self.delegate.supports_get_generated_keys()
        })
    }

    fn supports_result_set_type(&self, result_set_type: ResultSetType) -> SqlResult<bool> {
        self.forward("supports_result_set_type", || {
            self.delegate.supports_result_set_type(result_set_type)
        })
    }

    fn supports_result_set_concurrency(
        &self,
        result_set_type: ResultSetType,
        concurrency: Concurrency,
    ) -> SqlResult<bool> {
        self.forward("supports_result_set_concurrency", || {
            self.delegate
                .supports_result_set_concurrency(result_set_type, concurrency)
        })
    }

    fn supports_result_set_holdability(&self, holdability: Holdability) -> SqlResult<bool> {
        self.forward("supports_result_set_holdability", || {
            self.delegate.supports_result_set_holdability(holdability)
        })
    }

    fn result_set_holdability(&self) -> SqlResult<Holdability> {
        self.forward("result_set_holdability", || {
            self.delegate.result_set_holdability()
        })
    }

    fn supports_named_parameters(&self) -> SqlResult<bool> {
        self.forward("supports_named_parameters", || {
            self.delegate.supports_named_parameters()
        })
    }

    fn supports_multiple_result_sets(&self) -> SqlResult<bool> {
        self.forward("supports_multiple_result_sets", || {
            self.delegate.supports_multiple_result_sets()
        })
    }

    fn supports_stored_procedures(&self) -> SqlResult<bool> {
        self.forward("supports_stored_procedures", || {
            self.delegate.supports_stored_procedures()
        })
    }

    fn supports_outer_joins(&self) -> SqlResult<bool> {
        self.forward("supports_outer_joins", || self.delegate.supports_outer_joins())
    }

    fn stores_upper_case_identifiers(&self) -> SqlResult<bool> {
        self.forward("stores_upper_case_identifiers", || {
            self.delegate.stores_upper_case_identifiers()
        })
    }

    fn stores_lower_case_identifiers(&self) -> SqlResult<bool> {
        self.forward("stores_lower_case_identifiers", || {
            self.delegate.stores_lower_case_identifiers()
        })
    }

    fn stores_mixed_case_identifiers(&self) -> SqlResult<bool> {
        self.forward("stores_mixed_case_identifiers", || {
            self.delegate.stores_mixed_case_identifiers()
        })
    }

    fn supports_mixed_case_identifiers(&self) -> SqlResult<bool> {
        self.forward("supports_mixed_case_identifiers", || {
            self.delegate.supports_mixed_case_identifiers()
        })
    }

    fn nulls_are_sorted_high(&self) -> SqlResult<bool> {
        self.forward("nulls_are_sorted_high", || self.delegate.nulls_are_sorted_high())
    }

    fn nulls_are_sorted_low(&self) -> SqlResult<bool> {
        self.forward("nulls_are_sorted_low", || self.delegate.nulls_are_sorted_low())
    }

    fn nulls_are_sorted_at_start(&self) -> SqlResult<bool> {
        self.forward("nulls_are_sorted_at_start", || {
            self.delegate.nulls_are_sorted_at_start()
        })
    }

    fn nulls_are_sorted_at_end(&self) -> SqlResult<bool> {
        self.forward("nulls_are_sorted_at_end", || {
            self.delegate.nulls_are_sorted_at_end()
        })
    }

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        procedure_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("procedures", || {
            self.delegate
                .procedures(catalog, schema_pattern, procedure_pattern)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("tables", || {
            self.delegate
                .tables(catalog, schema_pattern, table_pattern, types)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn schemas(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("schemas", || {
            self.delegate.schemas().map(|rs| self.wrap_result_set(rs))
        })
    }

    fn catalogs(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("catalogs", || {
            self.delegate.catalogs().map(|rs| self.wrap_result_set(rs))
        })
    }

    fn table_types(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("table_types", || {
            self.delegate.table_types().map(|rs| self.wrap_result_set(rs))
        })
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("columns", || {
            self.delegate
                .columns(catalog, schema_pattern, table_pattern, column_pattern)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("primary_keys", || {
            self.delegate
                .primary_keys(catalog, schema, table)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("imported_keys", || {
            self.delegate
                .imported_keys(catalog, schema, table)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("exported_keys", || {
            self.delegate
                .exported_keys(catalog, schema, table)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique: bool,
        approximate: bool,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("index_info", || {
            self.delegate
                .index_info(catalog, schema, table, unique, approximate)
                .map(|rs| self.wrap_result_set(rs))
        })
    }

    fn type_info(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.forward("type_info", || {
            self.delegate.type_info().map(|rs| self.wrap_result_set(rs))
        })
    }

    fn connection(&self) -> SqlResult<Arc<dyn Connection>> {
        self.forward("connection", || {
            self.connection
                .upgrade()
                .ok_or(SqlError::OwnerReleased("connection"))
        })
    }
}
