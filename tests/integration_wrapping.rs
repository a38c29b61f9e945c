//! 子对象包装与自省集成测试
//!
//! 测试范围:
//! - 产生子对象的操作返回包装后的子对象
//! - 子对象指向所属的包装对象，而不是驱动对象
//! - 所属对象释放后的行为
//! - 自省先查包装自身，再查拦截器，最后查被委托对象

mod common;

use std::sync::Arc;

use common::{metered, wrapped, USERS_SQL};
use sql_delegate::api::interceptor::MetricsInterceptor;
use sql_delegate::api::{
    Connection, DatabaseMetaData, DelegateCallableStatement, DelegateConnection,
    DelegateDatabaseMetaData, DelegatePreparedStatement, DelegateResultSet, DelegateStatement,
    PreparedStatement, ResultSet, ResultSetMetaData, Statement, Wrapper, WrapperExt,
};
use sql_delegate::core::{Column, SqlError};
use sql_delegate::mock::{
    MockConnection, MockDatabaseMetaData, MockResultSet, MockResultSetMetaData, MockStatement,
};

/// 每种子对象都是对应的包装类型
#[test]
fn test_children_are_wrapped() {
    let (_raw, conn) = wrapped();

    let stmt = conn.create_statement().unwrap();
    assert!(stmt.as_any().is::<DelegateStatement<dyn Statement>>());

    let ps = conn.prepare_statement(USERS_SQL).unwrap();
    assert!(ps.as_any().is::<DelegatePreparedStatement>());

    let call = conn.prepare_call("{call refresh()}").unwrap();
    assert!(call.as_any().is::<DelegateCallableStatement>());

    let meta = conn.metadata().unwrap();
    assert!(meta.as_any().is::<DelegateDatabaseMetaData>());

    let rs = stmt.execute_query(USERS_SQL).unwrap();
    assert!(rs.as_any().is::<DelegateResultSet>());

    let rs = ps.execute_query_prepared().unwrap();
    assert!(rs.as_any().is::<DelegateResultSet>());

    let tables = meta.tables(None, None, Some("%"), None).unwrap();
    assert!(tables.as_any().is::<DelegateResultSet>());

    stmt.execute(USERS_SQL).unwrap();
    let current = stmt.result_set().unwrap().unwrap();
    assert!(current.as_any().is::<DelegateResultSet>());

    let keys = stmt.generated_keys().unwrap();
    assert!(keys.as_any().is::<DelegateResultSet>());
}

/// 包装对象通过 unwrap 返回驱动实际创建的对象
#[test]
fn test_unwrap_reaches_driver_objects() {
    let (raw, conn) = wrapped();

    let stmt = conn.create_statement().unwrap();
    let driver_stmt = raw.last_statement().unwrap();
    assert_eq!(stmt.unwrap_as::<MockStatement>().unwrap().id(), driver_stmt.id());

    let rs = stmt.execute_query(USERS_SQL).unwrap();
    let driver_rs = driver_stmt.last_result_set().unwrap();
    assert_eq!(rs.unwrap_as::<MockResultSet>().unwrap().id(), driver_rs.id());

    let meta = conn.metadata().unwrap();
    let driver_meta = raw.last_metadata().unwrap();
    assert_eq!(
        meta.unwrap_as::<MockDatabaseMetaData>().unwrap().label(),
        driver_meta.label()
    );
}

/// 没有结果时 result_set 返回 None，不包装
#[test]
fn test_absent_result_set_not_wrapped() {
    let (_raw, conn) = wrapped();
    let stmt = conn.create_statement().unwrap();
    assert!(!stmt.execute("UPDATE users SET name = 'x'").unwrap());
    assert!(stmt.result_set().unwrap().is_none());
    assert_eq!(stmt.update_count().unwrap(), Some(2));

    let ps = conn.prepare_statement("DELETE FROM users").unwrap();
    assert!(ps.metadata().unwrap().is_none());
}

/// 列描述和参数描述原样返回
#[test]
fn test_metadata_descriptors_not_wrapped() {
    let (_raw, conn) = wrapped();
    let ps = conn.prepare_statement(USERS_SQL).unwrap();
    let rsmd = ps.metadata().unwrap().unwrap();
    assert!(rsmd.as_any().is::<MockResultSetMetaData>());
    assert_eq!(rsmd.column_count().unwrap(), 2);

    let rs = ps.execute_query_prepared().unwrap();
    assert!(rs.metadata().unwrap().as_any().is::<MockResultSetMetaData>());
}

/// 语句的 connection() 返回包装连接
#[test]
fn test_statement_connection_is_wrapper() {
    let (_raw, conn) = wrapped();
    let conn_dyn: Arc<dyn Connection> = conn.clone();

    let stmt = conn.create_statement().unwrap();
    let owner = stmt.connection().unwrap();
    assert!(owner.as_any().is::<DelegateConnection>());
    assert!(Arc::ptr_eq(&owner, &conn_dyn));

    let ps = conn.prepare_statement(USERS_SQL).unwrap();
    assert!(Arc::ptr_eq(&ps.connection().unwrap(), &conn_dyn));

    let call = conn.prepare_call("{call refresh()}").unwrap();
    assert!(Arc::ptr_eq(&call.connection().unwrap(), &conn_dyn));

    let meta = conn.metadata().unwrap();
    assert!(Arc::ptr_eq(&meta.connection().unwrap(), &conn_dyn));
}

/// 结果集的 statement() 返回产生它的语句包装
#[test]
fn test_result_set_statement_is_wrapper() {
    let (_raw, conn) = wrapped();

    let stmt = conn.create_statement().unwrap();
    let rs = stmt.execute_query(USERS_SQL).unwrap();
    let owner = rs.statement().unwrap().unwrap();
    assert!(owner.as_any().is::<DelegateStatement<dyn Statement>>());
    assert!(Arc::ptr_eq(&owner, &stmt));

    let ps = conn.prepare_statement(USERS_SQL).unwrap();
    let rs = ps.execute_query_prepared().unwrap();
    let owner = rs.statement().unwrap().unwrap();
    assert!(owner.as_any().is::<DelegatePreparedStatement>());
}

/// 目录查询产生的结果集没有所属语句
#[test]
fn test_catalog_result_set_has_no_statement() {
    let (_raw, conn) = wrapped();
    let meta = conn.metadata().unwrap();

    for rs in [
        meta.tables(None, None, None, None).unwrap(),
        meta.columns(None, None, Some("users"), None).unwrap(),
        meta.primary_keys(None, None, "users").unwrap(),
        meta.type_info().unwrap(),
    ] {
        assert!(rs.statement().unwrap().is_none());
    }
}

/// 所属包装释放后返回 OwnerReleased
#[test]
fn test_owner_released() {
    let (_raw, conn) = wrapped();
    let stmt = conn.create_statement().unwrap();
    let meta = conn.metadata().unwrap();
    let rs = stmt.execute_query(USERS_SQL).unwrap();

    drop(stmt);
    assert_eq!(
        rs.statement().err(),
        Some(SqlError::OwnerReleased("statement"))
    );
    // 结果集本身仍然可用
    assert!(rs.next().unwrap());
    assert_eq!(rs.get_i32(Column::Index(1)).unwrap(), Some(1));

    let stmt = conn.create_statement().unwrap();
    drop(conn);
    assert_eq!(
        stmt.connection().err().map(|e| e.sql_state().to_string()),
        Some("HY000".to_string())
    );
    assert!(matches!(
        meta.connection(),
        Err(SqlError::OwnerReleased("connection"))
    ));
}

/// 自省：包装自身、拦截器、被委托对象
#[test]
fn test_introspection_order() {
    let (raw, conn) = metered();

    assert!(conn.is_wrapper_for::<DelegateConnection<MetricsInterceptor>>().unwrap());
    assert!(conn.is_wrapper_for::<MetricsInterceptor>().unwrap());
    assert!(conn.is_wrapper_for::<MockConnection>().unwrap());
    assert!(!conn.is_wrapper_for::<String>().unwrap());

    let itself = conn.unwrap_as::<DelegateConnection<MetricsInterceptor>>().unwrap();
    assert!(std::ptr::eq(itself, conn.as_ref()));

    let interceptor = conn.unwrap_as::<MetricsInterceptor>().unwrap();
    assert!(std::ptr::eq(interceptor, conn.interceptor().as_ref()));

    let driver = conn.unwrap_as::<MockConnection>().unwrap();
    assert_eq!(driver.id(), raw.id());

    // 自身和拦截器命中时不询问被委托对象，只有取 MockConnection 那次到达驱动
    assert_eq!(raw.log().count("unwrap"), 1);

    assert_eq!(
        conn.unwrap_as::<String>().err(),
        Some(SqlError::NotWrapperFor(std::any::type_name::<String>()))
    );
    assert_eq!(raw.log().count("unwrap"), 2);

    // 驱动返回的错误原样传回
    let refused = SqlError::database("HY024", 77, "introspection disabled");
    raw.fail_next("unwrap", refused.clone());
    assert_eq!(conn.unwrap_as::<String>().err(), Some(refused.clone()));
    raw.fail_next("is_wrapper_for", refused.clone());
    assert_eq!(conn.is_wrapper_for::<String>(), Err(refused));
    assert_eq!(raw.log().count("is_wrapper_for"), 3);
}

/// 子包装可以取得共享的拦截器
#[test]
fn test_children_share_interceptor() {
    let (_raw, conn) = metered();
    let stmt = conn.create_statement().unwrap();
    let rs = stmt.execute_query(USERS_SQL).unwrap();

    let from_conn = conn.interceptor().as_ref() as *const MetricsInterceptor;
    let from_stmt = stmt.unwrap_as::<MetricsInterceptor>().unwrap() as *const MetricsInterceptor;
    let from_rs = rs.unwrap_as::<MetricsInterceptor>().unwrap() as *const MetricsInterceptor;
    assert_eq!(from_conn, from_stmt);
    assert_eq!(from_conn, from_rs);
}

/// 多层包装：外层请求内层类型时返回内层包装
#[test]
fn test_nested_wrappers() {
    let raw = MockConnection::new();
    let inner = DelegateConnection::new(raw.clone());
    let outer = DelegateConnection::with_interceptor(inner.clone(), MetricsInterceptor::default());

    let found = outer.unwrap_as::<DelegateConnection>().unwrap();
    assert!(std::ptr::eq(found, inner.as_ref()));
    assert_eq!(outer.unwrap_as::<MockConnection>().unwrap().id(), raw.id());

    let stmt = outer.create_statement().unwrap();
    let inner_stmt = stmt.unwrap_as::<DelegateStatement<dyn Statement>>().unwrap();
    assert!(inner_stmt.connection().unwrap().as_any().is::<DelegateConnection>());
    assert!(stmt
        .connection()
        .unwrap()
        .as_any()
        .is::<DelegateConnection<MetricsInterceptor>>());
    assert_eq!(raw.log().count("create_statement"), 1);
}

/// 关闭状态由被委托对象决定
#[test]
fn test_close_forwarded() {
    let (raw, conn) = wrapped();
    let stmt = conn.create_statement().unwrap();
    let rs = stmt.execute_query(USERS_SQL).unwrap();

    rs.close().unwrap();
    assert!(rs.is_closed().unwrap());
    assert!(!stmt.is_closed().unwrap());

    conn.close().unwrap();
    assert!(conn.is_closed().unwrap());
    assert!(stmt.is_closed().unwrap());
    assert!(raw.is_closed().unwrap());
    assert!(matches!(conn.create_statement(), Err(SqlError::Closed(_))));
}
