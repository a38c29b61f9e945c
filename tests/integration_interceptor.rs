//! 拦截器集成测试
//!
//! 测试范围:
//! - 安装在连接上的拦截器作用于整个对象图
//! - 指标统计
//! - 错误转换
//! - 拦截器拒绝调用时不触达被委托对象
//! - 由配置构造的拦截器链

mod common;

use std::io::Write;

use common::{metered, wrapped_with, USERS_SQL};
use sql_delegate::api::interceptor::{Call, Capability, ErrorMapper, Interceptor};
use sql_delegate::api::{
    Connection, DatabaseMetaData, DelegateConnection, PreparedStatement, ResultSet, Statement,
    WrapperExt,
};
use sql_delegate::config::{Config, ConfiguredInterceptor};
use sql_delegate::core::{SqlError, SqlResult};
use tempfile::NamedTempFile;

/// 指标覆盖连接派生出的所有对象
#[test]
fn test_metrics_cover_object_graph() {
    let (_raw, conn) = metered();

    let stmt = conn.create_statement().unwrap();
    let rs = stmt.execute_query(USERS_SQL).unwrap();
    while rs.next().unwrap() {}
    rs.close().unwrap();

    let meta = conn.metadata().unwrap();
    let tables = meta.tables(None, None, None, None).unwrap();
    tables.next().unwrap();

    let metrics = conn.interceptor();
    assert_eq!(
        metrics
            .stats_for(Capability::Connection, "create_statement")
            .unwrap()
            .calls,
        1
    );
    assert_eq!(
        metrics
            .stats_for(Capability::Statement, "execute_query")
            .unwrap()
            .calls,
        1
    );
    // 两行数据加一次越界
    assert_eq!(
        metrics.stats_for(Capability::ResultSet, "next").unwrap().calls,
        4
    );
    assert_eq!(
        metrics
            .stats_for(Capability::DatabaseMetaData, "tables")
            .unwrap()
            .calls,
        1
    );
    // 语句、结果集、元数据、目录结果集
    assert_eq!(metrics.children_wrapped(), 4);
    assert_eq!(metrics.total_errors(), 0);
}

/// 失败的调用计入错误数
#[test]
fn test_metrics_count_errors() {
    let (raw, conn) = metered();
    let ps = conn.prepare_statement("DELETE FROM users WHERE id = ?").unwrap();

    raw.fail_next("execute_update_prepared", SqlError::database("40001", 1213, "deadlock"));
    assert!(ps.execute_update_prepared().is_err());
    ps.set_i64(1, 9).unwrap();
    assert_eq!(ps.execute_update_prepared().unwrap(), 0);

    let stats = conn
        .interceptor()
        .stats_for(Capability::PreparedStatement, "execute_update_prepared")
        .unwrap();
    assert_eq!(stats.calls, 2);
    assert_eq!(stats.errors, 1);
    assert_eq!(conn.interceptor().total_errors(), 1);

    let snapshot = conn.interceptor().snapshot();
    assert_eq!(snapshot[0].capability, Capability::Connection);

    conn.interceptor().reset();
    assert_eq!(conn.interceptor().total_calls(), 0);
}

/// 错误转换作用于所有子对象
#[test]
fn test_error_mapper_applies_to_children() {
    let mapper = ErrorMapper::new(|call: &Call<'_>, err: SqlError| {
        SqlError::database(
            "HY000",
            err.vendor_code(),
            format!("{} 失败: {}", call, err),
        )
    });
    let (raw, conn) = wrapped_with(mapper);
    let stmt = conn.create_statement().unwrap();

    raw.fail_next("execute_update", SqlError::database("23505", 1062, "duplicate"));
    let err = stmt.execute_update("INSERT INTO users VALUES (1)").unwrap_err();
    assert_eq!(err.sql_state(), "HY000");
    assert_eq!(err.vendor_code(), 1062);
    assert!(err.to_string().contains("statement.execute_update"));

    // 成功结果不受影响
    assert_eq!(stmt.execute_update("INSERT INTO users VALUES (1)"), Ok(0));
}

/// 只读守卫：拒绝写操作，不调用被委托对象
struct ReadOnlyGuard;

impl Interceptor for ReadOnlyGuard {
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        let writes = call
            .sql
            .map(|sql| {
                let head = sql.trim_start().to_ascii_uppercase();
                ["INSERT", "UPDATE", "DELETE"]
                    .iter()
                    .any(|kw| head.starts_with(kw))
            })
            .unwrap_or(false);
        if writes {
            return Err(SqlError::FeatureNotSupported(format!("只读连接拒绝 {}", call)));
        }
        proceed()
    }
}

#[test]
fn test_interceptor_can_reject_calls() {
    let (raw, conn) = wrapped_with(ReadOnlyGuard);

    let stmt = conn.create_statement().unwrap();
    assert!(matches!(
        stmt.execute_update("UPDATE users SET name = 'x'"),
        Err(SqlError::FeatureNotSupported(_))
    ));
    assert_eq!(raw.log().count("execute_update"), 0);

    let rs = stmt.execute_query(USERS_SQL).unwrap();
    assert!(rs.next().unwrap());

    assert!(conn.prepare_statement("DELETE FROM users").is_err());
    assert_eq!(raw.log().count("prepare_statement"), 0);

    // 拦截器本身可以通过自省取得
    assert!(stmt.is_wrapper_for::<ReadOnlyGuard>().unwrap());
}

/// 由配置文件构造拦截器链
#[test]
fn test_configured_interceptor_chain() {
    let mut file = NamedTempFile::new().expect("Failed to create temporary file");
    file.write_all(
        b"[intercept]\nlog_calls = true\ncall_log_level = \"debug\"\nslow_call_threshold_ms = 1000\nmetrics = true\nmetrics_prefix = \"orders\"\n",
    )
    .expect("Failed to write config");

    let config = Config::load(file.path()).expect("Failed to load config");
    let chain: ConfiguredInterceptor = config.intercept.build().unwrap();
    let (_raw, conn) = wrapped_with(chain);

    let ps = conn.prepare_statement(USERS_SQL).unwrap();
    let rs = ps.execute_query_prepared().unwrap();
    assert!(rs.next().unwrap());

    let metrics = conn.interceptor().inner();
    assert_eq!(metrics.calls_metric(), "orders_calls_total");
    assert_eq!(
        metrics
            .stats_for(Capability::PreparedStatement, "execute_query_prepared")
            .unwrap()
            .calls,
        1
    );
    assert_eq!(metrics.children_wrapped(), 2);
    assert!(conn.interceptor().outer().is_enabled());
}

/// 两个连接各自的拦截器互不影响
#[test]
fn test_interceptors_are_per_connection() {
    let (_raw_a, conn_a) = metered();
    let (_raw_b, conn_b) = metered();

    conn_a.create_statement().unwrap();
    conn_a.create_statement().unwrap();
    conn_b.create_statement().unwrap();

    assert_eq!(conn_a.interceptor().total_calls(), 2);
    assert_eq!(conn_b.interceptor().total_calls(), 1);
}

/// 共享拦截器的多个连接
#[test]
fn test_shared_interceptor_across_connections() {
    use sql_delegate::api::interceptor::MetricsInterceptor;
    use std::sync::Arc;

    let shared = Arc::new(MetricsInterceptor::new("pool"));
    let a = DelegateConnection::with_shared_interceptor(common::mock_connection(), shared.clone());
    let b = DelegateConnection::with_shared_interceptor(common::mock_connection(), shared.clone());

    a.commit().unwrap_err();
    b.commit().unwrap_err();
    assert_eq!(
        shared.stats_for(Capability::Connection, "commit").unwrap().errors,
        2
    );
}
