//! 内存元数据

use crate::api::core::{
    Connection, DatabaseMetaData, ParameterMetaData, ResultSet, ResultSetMetaData, Wrapper,
};
use crate::core::{
    Concurrency, Holdability, IsolationLevel, Nullability, ParameterMode, ResultSetType,
    SqlError, SqlResult, SqlType, StatementOptions, TypeKey,
};
use crate::mock::connection::MockConnection;
use crate::mock::result_set::MockResultSet;
use crate::mock::{args, CallRecord, MockRows, MockShared};
use std::any::Any;
use std::sync::{Arc, Weak};

pub const PRODUCT_NAME: &str = "MockDB";
pub const PRODUCT_VERSION: &str = "3.2.1";
pub const DRIVER_NAME: &str = "sql-delegate mock driver";
pub const DRIVER_MAJOR: u32 = 1;
pub const DRIVER_MINOR: u32 = 4;

const TABLE_COLUMNS: &[&str] = &["TABLE_CAT", "TABLE_SCHEM", "TABLE_NAME", "TABLE_TYPE", "REMARKS"];
const COLUMN_COLUMNS: &[&str] = &[
    "TABLE_CAT",
    "TABLE_SCHEM",
    "TABLE_NAME",
    "COLUMN_NAME",
    "DATA_TYPE",
    "TYPE_NAME",
    "COLUMN_SIZE",
    "NULLABLE",
];
const KEY_COLUMNS: &[&str] = &[
    "PKTABLE_NAME",
    "PKCOLUMN_NAME",
    "FKTABLE_NAME",
    "FKCOLUMN_NAME",
    "KEY_SEQ",
];

/// 内存数据库元数据
///
/// 目录查询返回的结果集不属于任何语句。可以用
/// `register_query("metadata:<查询名>", rows)` 预置目录查询的返回行，
/// 例如 `metadata:tables`。
#[derive(Debug)]
pub struct MockDatabaseMetaData {
    id: u64,
    shared: Arc<MockShared>,
    connection: Weak<MockConnection>,
}

impl MockDatabaseMetaData {
    pub(crate) fn new(shared: Arc<MockShared>, connection: Weak<MockConnection>) -> Arc<Self> {
        let id = shared.next_id();
        Arc::new(Self {
            id,
            shared,
            connection,
        })
    }

    pub fn label(&self) -> String {
        format!("metadata#{}", self.id)
    }

    fn enter(&self, operation: &'static str, args: Vec<String>) -> SqlResult<()> {
        self.shared.enter(&self.label(), operation, args)
    }

    fn catalog_query(&self, name: &str, columns: &[&str]) -> Arc<dyn ResultSet> {
        let mut rows = self.shared.rows_for(&format!("metadata:{}", name));
        if rows.columns.is_empty() {
            rows = MockRows::new(columns);
        }
        MockResultSet::new(rows, StatementOptions::default(), self.shared.clone(), None)
    }
}

impl Wrapper for MockDatabaseMetaData {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn unwrap_any(&self, key: TypeKey) -> SqlResult<&dyn Any> {
        self.shared.unwrap_self(&self.label(), self, key)
    }

    fn is_wrapper_for_any(&self, key: TypeKey) -> SqlResult<bool> {
        self.shared.is_self(&self.label(), self, key)
    }
}

impl DatabaseMetaData for MockDatabaseMetaData {
    fn database_product_name(&self) -> SqlResult<String> {
        self.enter("database_product_name", args!())?;
        Ok(PRODUCT_NAME.to_string())
    }

    fn database_product_version(&self) -> SqlResult<String> {
        self.enter("database_product_version", args!())?;
        Ok(PRODUCT_VERSION.to_string())
    }

    fn database_major_version(&self) -> SqlResult<u32> {
        self.enter("database_major_version", args!())?;
        Ok(3)
    }

    fn database_minor_version(&self) -> SqlResult<u32> {
        self.enter("database_minor_version", args!())?;
        Ok(2)
    }

    fn driver_name(&self) -> SqlResult<String> {
        self.enter("driver_name", args!())?;
        Ok(DRIVER_NAME.to_string())
    }

    fn driver_version(&self) -> SqlResult<String> {
        self.enter("driver_version", args!())?;
        Ok(format!("{}.{}", DRIVER_MAJOR, DRIVER_MINOR))
    }

    fn driver_major_version(&self) -> u32 {
        self.shared.log().record(CallRecord {
            target: self.label(),
            operation: "driver_major_version",
            args: Vec::new(),
        });
        DRIVER_MAJOR
    }

    fn driver_minor_version(&self) -> u32 {
        self.shared.log().record(CallRecord {
            target: self.label(),
            operation: "driver_minor_version",
            args: Vec::new(),
        });
        DRIVER_MINOR
    }

    fn url(&self) -> SqlResult<Option<String>> {
        self.enter("url", args!())?;
        Ok(Some("mock://localhost/test".to_string()))
    }

    fn user_name(&self) -> SqlResult<String> {
        self.enter("user_name", args!())?;
        Ok("tester".to_string())
    }

    fn is_read_only(&self) -> SqlResult<bool> {
        self.enter("is_read_only", args!())?;
        Ok(false)
    }

    fn identifier_quote_string(&self) -> SqlResult<String> {
        self.enter("identifier_quote_string", args!())?;
        Ok("\"".to_string())
    }

    fn sql_keywords(&self) -> SqlResult<Vec<String>> {
        self.enter("sql_keywords", args!())?;
        Ok(vec!["LIMIT".to_string(), "OFFSET".to_string()])
    }

    fn catalog_separator(&self) -> SqlResult<String> {
        self.enter("catalog_separator", args!())?;
        Ok(".".to_string())
    }

    fn catalog_term(&self) -> SqlResult<String> {
        self.enter("catalog_term", args!())?;
        Ok("database".to_string())
    }

    fn schema_term(&self) -> SqlResult<String> {
        self.enter("schema_term", args!())?;
        Ok("schema".to_string())
    }

    fn procedure_term(&self) -> SqlResult<String> {
        self.enter("procedure_term", args!())?;
        Ok("procedure".to_string())
    }

    fn search_string_escape(&self) -> SqlResult<String> {
        self.enter("search_string_escape", args!())?;
        Ok("\\".to_string())
    }

    fn max_connections(&self) -> SqlResult<u32> {
        self.enter("max_connections", args!())?;
        Ok(0)
    }

    fn max_statement_length(&self) -> SqlResult<u32> {
        self.enter("max_statement_length", args!())?;
        Ok(0)
    }

    fn max_column_name_length(&self) -> SqlResult<u32> {
        self.enter("max_column_name_length", args!())?;
        Ok(64)
    }

    fn max_table_name_length(&self) -> SqlResult<u32> {
        self.enter("max_table_name_length", args!())?;
        Ok(64)
    }

    fn supports_transactions(&self) -> SqlResult<bool> {
        self.enter("supports_transactions", args!())?;
        Ok(true)
    }

    fn supports_transaction_isolation_level(&self, level: IsolationLevel) -> SqlResult<bool> {
        self.enter("supports_transaction_isolation_level", args!(level))?;
        Ok(level != IsolationLevel::None)
    }

    fn default_transaction_isolation(&self) -> SqlResult<IsolationLevel> {
        self.enter("default_transaction_isolation", args!())?;
        Ok(IsolationLevel::ReadCommitted)
    }

    fn supports_batch_updates(&self) -> SqlResult<bool> {
        self.enter("supports_batch_updates", args!())?;
        Ok(true)
    }

    fn supports_savepoints(&self) -> SqlResult<bool> {
        self.enter("supports_savepoints", args!())?;
        Ok(true)
    }

    fn supports_get_generated_keys(&self) -> SqlResult<bool> {
        self.enter("supports_get_generated_keys", args!())?;
        Ok(true)
    }

    fn supports_result_set_type(&self, result_set_type: ResultSetType) -> SqlResult<bool> {
        self.enter("supports_result_set_type", args!(result_set_type))?;
        Ok(true)
    }

    fn supports_result_set_concurrency(
        &self,
        result_set_type: ResultSetType,
        concurrency: Concurrency,
    ) -> SqlResult<bool> {
        self.enter(
            "supports_result_set_concurrency",
            args!(result_set_type, concurrency),
        )?;
        Ok(true)
    }

    fn supports_result_set_holdability(&self, holdability: Holdability) -> SqlResult<bool> {
        self.enter("supports_result_set_holdability", args!(holdability))?;
        Ok(true)
    }

    fn result_set_holdability(&self) -> SqlResult<Holdability> {
        self.enter("result_set_holdability", args!())?;
        Ok(Holdability::HoldCursorsOverCommit)
    }

    fn supports_named_parameters(&self) -> SqlResult<bool> {
        self.enter("supports_named_parameters", args!())?;
        Ok(true)
    }

    fn supports_multiple_result_sets(&self) -> SqlResult<bool> {
        self.enter("supports_multiple_result_sets", args!())?;
        Ok(false)
    }

    fn supports_stored_procedures(&self) -> SqlResult<bool> {
        self.enter("supports_stored_procedures", args!())?;
        Ok(true)
    }

    fn supports_outer_joins(&self) -> SqlResult<bool> {
        self.enter("supports_outer_joins", args!())?;
        Ok(true)
    }

    fn stores_upper_case_identifiers(&self) -> SqlResult<bool> {
        self.enter("stores_upper_case_identifiers", args!())?;
        Ok(false)
    }

    fn stores_lower_case_identifiers(&self) -> SqlResult<bool> {
        self.enter("stores_lower_case_identifiers", args!())?;
        Ok(true)
    }

    fn stores_mixed_case_identifiers(&self) -> SqlResult<bool> {
        self.enter("stores_mixed_case_identifiers", args!())?;
        Ok(false)
    }

    fn supports_mixed_case_identifiers(&self) -> SqlResult<bool> {
        self.enter("supports_mixed_case_identifiers", args!())?;
        Ok(false)
    }

    fn nulls_are_sorted_high(&self) -> SqlResult<bool> {
        self.enter("nulls_are_sorted_high", args!())?;
        Ok(true)
    }

    fn nulls_are_sorted_low(&self) -> SqlResult<bool> {
        self.enter("nulls_are_sorted_low", args!())?;
        Ok(false)
    }

    fn nulls_are_sorted_at_start(&self) -> SqlResult<bool> {
        self.enter("nulls_are_sorted_at_start", args!())?;
        Ok(false)
    }

    fn nulls_are_sorted_at_end(&self) -> SqlResult<bool> {
        self.enter("nulls_are_sorted_at_end", args!())?;
        Ok(false)
    }

    fn procedures(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        procedure_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("procedures", args!(catalog, schema_pattern, procedure_pattern))?;
        Ok(self.catalog_query(
            "procedures",
            &["PROCEDURE_CAT", "PROCEDURE_SCHEM", "PROCEDURE_NAME", "REMARKS"],
        ))
    }

    fn tables(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        types: Option<&[&str]>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("tables", args!(catalog, schema_pattern, table_pattern, types))?;
        Ok(self.catalog_query("tables", TABLE_COLUMNS))
    }

    fn schemas(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("schemas", args!())?;
        Ok(self.catalog_query("schemas", &["TABLE_SCHEM", "TABLE_CATALOG"]))
    }

    fn catalogs(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("catalogs", args!())?;
        Ok(self.catalog_query("catalogs", &["TABLE_CAT"]))
    }

    fn table_types(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("table_types", args!())?;
        Ok(self.catalog_query("table_types", &["TABLE_TYPE"]))
    }

    fn columns(
        &self,
        catalog: Option<&str>,
        schema_pattern: Option<&str>,
        table_pattern: Option<&str>,
        column_pattern: Option<&str>,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter(
            "columns",
            args!(catalog, schema_pattern, table_pattern, column_pattern),
        )?;
        Ok(self.catalog_query("columns", COLUMN_COLUMNS))
    }

    fn primary_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("primary_keys", args!(catalog, schema, table))?;
        Ok(self.catalog_query(
            "primary_keys",
            &["TABLE_CAT", "TABLE_SCHEM", "TABLE_NAME", "COLUMN_NAME", "KEY_SEQ", "PK_NAME"],
        ))
    }

    fn imported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("imported_keys", args!(catalog, schema, table))?;
        Ok(self.catalog_query("imported_keys", KEY_COLUMNS))
    }

    fn exported_keys(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("exported_keys", args!(catalog, schema, table))?;
        Ok(self.catalog_query("exported_keys", KEY_COLUMNS))
    }

    fn index_info(
        &self,
        catalog: Option<&str>,
        schema: Option<&str>,
        table: &str,
        unique: bool,
        approximate: bool,
    ) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("index_info", args!(catalog, schema, table, unique, approximate))?;
        Ok(self.catalog_query(
            "index_info",
            &["TABLE_NAME", "NON_UNIQUE", "INDEX_NAME", "COLUMN_NAME"],
        ))
    }

    fn type_info(&self) -> SqlResult<Arc<dyn ResultSet>> {
        self.enter("type_info", args!())?;
        Ok(self.catalog_query("type_info", &["TYPE_NAME", "DATA_TYPE", "PRECISION"]))
    }

    fn connection(&self) -> SqlResult<Arc<dyn Connection>> {
        self.enter("connection", args!())?;
        self.connection
            .upgrade()
            .map(|conn| conn as Arc<dyn Connection>)
            .ok_or(SqlError::OwnerReleased("connection"))
    }
}

/// 内存结果集列描述
///
/// 列类型取自第一行的值，没有数据行时视为 VARCHAR
#[derive(Debug, Clone)]
pub struct MockResultSetMetaData {
    columns: Vec<String>,
    types: Vec<SqlType>,
}

impl MockResultSetMetaData {
    pub fn from_rows(rows: &MockRows) -> Arc<Self> {
        let mut types: Vec<SqlType> = match rows.rows.first() {
            Some(first) => first
                .iter()
                .map(|v| match v.sql_type() {
                    SqlType::Null => SqlType::VarChar,
                    other => other,
                })
                .collect(),
            None => Vec::new(),
        };
        types.resize(rows.columns.len(), SqlType::VarChar);
        Arc::new(Self {
            columns: rows.columns.clone(),
            types,
        })
    }

    fn check(&self, column: usize) -> SqlResult<usize> {
        if column >= 1 && column <= self.columns.len() {
            Ok(column - 1)
        } else {
            Err(SqlError::InvalidArgument(format!("列序号越界: {}", column)))
        }
    }

    fn type_of(&self, column: usize) -> SqlResult<SqlType> {
        let i = self.check(column)?;
        Ok(self.types.get(i).copied().unwrap_or(SqlType::VarChar))
    }
}

impl Wrapper for MockResultSetMetaData {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ResultSetMetaData for MockResultSetMetaData {
    fn column_count(&self) -> SqlResult<usize> {
        Ok(self.columns.len())
    }

    fn column_name(&self, column: usize) -> SqlResult<String> {
        let i = self.check(column)?;
        Ok(self.columns[i].clone())
    }

    fn column_label(&self, column: usize) -> SqlResult<String> {
        self.column_name(column)
    }

    fn column_type(&self, column: usize) -> SqlResult<SqlType> {
        self.type_of(column)
    }

    fn column_type_name(&self, column: usize) -> SqlResult<String> {
        Ok(format!("{:?}", self.type_of(column)?).to_uppercase())
    }

    fn column_display_size(&self, column: usize) -> SqlResult<u32> {
        self.precision(column)
    }

    fn precision(&self, column: usize) -> SqlResult<u32> {
        Ok(match self.type_of(column)? {
            SqlType::Boolean => 1,
            SqlType::TinyInt => 3,
            SqlType::SmallInt => 5,
            SqlType::Integer => 10,
            SqlType::BigInt => 19,
            SqlType::Real => 7,
            SqlType::Double => 15,
            SqlType::Date => 10,
            SqlType::Time => 8,
            SqlType::Timestamp => 26,
            _ => 255,
        })
    }

    fn scale(&self, column: usize) -> SqlResult<u32> {
        self.check(column)?;
        Ok(0)
    }

    fn is_nullable(&self, column: usize) -> SqlResult<Nullability> {
        self.check(column)?;
        Ok(Nullability::Unknown)
    }

    fn is_auto_increment(&self, column: usize) -> SqlResult<bool> {
        self.check(column)?;
        Ok(false)
    }

    fn is_case_sensitive(&self, column: usize) -> SqlResult<bool> {
        Ok(matches!(self.type_of(column)?, SqlType::VarChar | SqlType::Char))
    }

    fn is_searchable(&self, column: usize) -> SqlResult<bool> {
        self.check(column)?;
        Ok(true)
    }

    fn is_currency(&self, column: usize) -> SqlResult<bool> {
        self.check(column)?;
        Ok(false)
    }

    fn is_signed(&self, column: usize) -> SqlResult<bool> {
        Ok(matches!(
            self.type_of(column)?,
            SqlType::TinyInt
                | SqlType::SmallInt
                | SqlType::Integer
                | SqlType::BigInt
                | SqlType::Real
                | SqlType::Double
                | SqlType::Decimal
        ))
    }

    fn is_read_only(&self, column: usize) -> SqlResult<bool> {
        self.check(column)?;
        Ok(false)
    }

    fn is_writable(&self, column: usize) -> SqlResult<bool> {
        self.check(column)?;
        Ok(true)
    }

    fn table_name(&self, column: usize) -> SqlResult<String> {
        self.check(column)?;
        Ok(String::new())
    }

    fn schema_name(&self, column: usize) -> SqlResult<String> {
        self.check(column)?;
        Ok(String::new())
    }

    fn catalog_name(&self, column: usize) -> SqlResult<String> {
        self.check(column)?;
        Ok(String::new())
    }
}

/// 内存参数描述，参数个数按 SQL 中的 `?` 计算
#[derive(Debug, Clone)]
pub struct MockParameterMetaData {
    count: usize,
    out: Vec<usize>,
}

impl MockParameterMetaData {
    pub fn for_sql(sql: &str, out: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            count: sql.matches('?').count(),
            out: out.to_vec(),
        })
    }

    fn check(&self, param: usize) -> SqlResult<()> {
        if param >= 1 && param <= self.count {
            Ok(())
        } else {
            Err(SqlError::InvalidArgument(format!("参数序号越界: {}", param)))
        }
    }
}

impl Wrapper for MockParameterMetaData {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ParameterMetaData for MockParameterMetaData {
    fn parameter_count(&self) -> SqlResult<usize> {
        Ok(self.count)
    }

    fn is_nullable(&self, param: usize) -> SqlResult<Nullability> {
        self.check(param)?;
        Ok(Nullability::Unknown)
    }

    fn is_signed(&self, param: usize) -> SqlResult<bool> {
        self.check(param)?;
        Ok(false)
    }

    fn precision(&self, param: usize) -> SqlResult<u32> {
        self.check(param)?;
        Ok(0)
    }

    fn scale(&self, param: usize) -> SqlResult<u32> {
        self.check(param)?;
        Ok(0)
    }

    fn parameter_type(&self, param: usize) -> SqlResult<SqlType> {
        self.check(param)?;
        Ok(SqlType::VarChar)
    }

    fn parameter_type_name(&self, param: usize) -> SqlResult<String> {
        self.check(param)?;
        Ok("VARCHAR".to_string())
    }

    fn parameter_mode(&self, param: usize) -> SqlResult<ParameterMode> {
        self.check(param)?;
        Ok(if self.out.contains(&param) {
            ParameterMode::Out
        } else {
            ParameterMode::In
        })
    }
}
