//! 转发行为集成测试
//!
//! 测试范围:
//! - 每个操作恰好调用被委托对象一次，参数原样传入
//! - 结果原样返回
//! - 被委托对象的错误原样传播

mod common;

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::time::Duration;

use common::{wrapped, USERS_SQL};
use sql_delegate::api::{
    CallableStatement, Connection, DatabaseMetaData, ParameterMetaData, PreparedStatement,
    ResultSet, Statement,
};
use sql_delegate::core::{
    Column, Concurrency, GeneratedKeys, IsolationLevel, Param, ResultSetType, SqlError, SqlType,
    StatementOptions, Value,
};
use sql_delegate::mock::MockRows;

/// 连接上的简单操作只调用一次，参数一致
#[test]
fn test_connection_forwards_once_with_same_args() {
    let (raw, conn) = wrapped();

    conn.set_auto_commit(false).unwrap();
    conn.set_catalog("sales").unwrap();
    conn.set_transaction_isolation(IsolationLevel::Serializable)
        .unwrap();
    conn.set_network_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let log = raw.log();
    for op in [
        "set_auto_commit",
        "set_catalog",
        "set_transaction_isolation",
        "set_network_timeout",
    ] {
        assert_eq!(log.count(op), 1, "{} 应只被调用一次", op);
    }
    let catalog_call = &log.calls_for(&raw.label())[1];
    assert_eq!(catalog_call.operation, "set_catalog");
    assert_eq!(catalog_call.args, vec!["\"sales\"".to_string()]);

    assert!(!conn.auto_commit().unwrap());
    assert_eq!(conn.catalog().unwrap().as_deref(), Some("sales"));
    assert_eq!(
        conn.transaction_isolation().unwrap(),
        IsolationLevel::Serializable
    );
    assert_eq!(
        conn.network_timeout().unwrap(),
        Some(Duration::from_secs(5))
    );
}

/// create_statement 的完整场景
#[test]
fn test_create_statement_scenario() {
    let (raw, conn) = wrapped();

    let stmt = conn.create_statement().unwrap();
    assert_eq!(raw.log().count("create_statement"), 1);

    let rs = stmt.execute_query(USERS_SQL).unwrap();
    let driver_stmt = raw.last_statement().unwrap();
    let calls = raw.log().calls_for(&driver_stmt.label());
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, "execute_query");
    assert_eq!(calls[0].args, vec![format!("{:?}", USERS_SQL)]);

    let mut names = Vec::new();
    while rs.next().unwrap() {
        names.push(rs.get_string(Column::Label("name")).unwrap().unwrap());
    }
    assert_eq!(names, vec!["alice", "bob"]);

    // 3 次 next，2 次 get_string
    let rs_label = driver_stmt.last_result_set().unwrap().label();
    assert_eq!(raw.log().calls_for(&rs_label).len(), 5);

    stmt.close().unwrap();
    assert!(stmt.is_closed().unwrap());
    assert!(rs.is_closed().unwrap());
}

/// 被委托对象的错误原样返回
#[test]
fn test_errors_propagate_unchanged() {
    let (raw, conn) = wrapped();
    let stmt = conn.create_statement().unwrap();

    let injected = SqlError::database("23505", 1062, "duplicate key");
    raw.fail_next("execute_update", injected.clone());
    assert_eq!(stmt.execute_update("INSERT INTO t VALUES (1)"), Err(injected));

    // 注入的错误只生效一次
    assert_eq!(stmt.execute_update("INSERT INTO t VALUES (1)"), Ok(0));

    raw.fail_next("commit", SqlError::Timeout("lock wait".into()));
    assert_eq!(
        conn.commit(),
        Err(SqlError::Timeout("lock wait".into()))
    );

    raw.fail_next("prepare_statement", SqlError::Closed("connection#1".into()));
    assert!(matches!(
        conn.prepare_statement("SELECT 1"),
        Err(SqlError::Closed(_))
    ));
}

/// 驱动自身的业务错误也原样返回
#[test]
fn test_driver_errors_pass_through() {
    let (_raw, conn) = wrapped();
    let err = conn.commit().unwrap_err();
    assert_eq!(err.sql_state(), "25000");

    let stmt = conn.create_statement().unwrap();
    let err = stmt.execute_update(USERS_SQL).unwrap_err();
    assert_eq!(err.sql_state(), "07000");
}

/// 预编译语句的参数设置原样转发
#[test]
fn test_prepared_statement_parameters() {
    let (raw, conn) = wrapped();
    let ps = conn
        .prepare_statement("INSERT INTO users (id, name, avatar, note) VALUES (?, ?, ?, ?)")
        .unwrap();

    ps.set_i32(1, 7).unwrap();
    ps.set_string(2, "grace").unwrap();
    ps.set_binary_stream(3, Box::new(Cursor::new(vec![0xCA, 0xFE])), None)
        .unwrap();
    ps.set_null(4, SqlType::VarChar, None).unwrap();
    ps.execute_update_prepared().unwrap();

    let driver = raw.last_statement().unwrap();
    let params = driver.params();
    assert_eq!(params[&1], Value::Int(7));
    assert_eq!(params[&2], Value::String("grace".into()));
    assert_eq!(params[&3], Value::Bytes(vec![0xCA, 0xFE]));
    assert_eq!(params[&4], Value::Null);
    assert_eq!(raw.log().count("execute_update_prepared"), 1);

    let pmd = ps.parameter_metadata().unwrap();
    assert_eq!(pmd.parameter_count().unwrap(), 4);
}

/// 存储过程调用的输出参数读取
#[test]
fn test_callable_statement_forwarding() {
    let (raw, conn) = wrapped();
    let call = conn.prepare_call("{call user_count(?)}").unwrap();
    call.register_out_parameter(Param::Index(1), SqlType::BigInt)
        .unwrap();
    raw.last_statement()
        .unwrap()
        .set_out_value(Param::Index(1), Value::BigInt(42));

    assert!(!call.execute_prepared().unwrap());
    assert_eq!(call.get_i64(Param::Index(1)).unwrap(), Some(42));
    assert!(!call.was_null().unwrap());
    assert_eq!(raw.log().count("register_out_parameter"), 1);
    assert_eq!(raw.log().count("get_i64"), 1);
}

/// 结果集读取的流对象原样返回
#[test]
fn test_result_set_stream() {
    let (raw, conn) = wrapped();
    raw.register_query(
        "SELECT body FROM files",
        MockRows::new(&["body"]).with_row(vec![Value::Bytes(b"hello".to_vec())]),
    );
    let stmt = conn.create_statement().unwrap();
    let rs = stmt.execute_query("SELECT body FROM files").unwrap();
    assert!(rs.next().unwrap());

    let mut body = String::new();
    rs.get_character_stream(Column::Index(1))
        .unwrap()
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert_eq!(body, "hello");
}

/// 客户端信息
#[test]
fn test_client_info() {
    let (raw, conn) = wrapped();

    let mut props = HashMap::new();
    props.insert("ApplicationName".to_string(), "billing".to_string());
    conn.set_client_info_all(props.clone()).unwrap();
    assert_eq!(conn.client_info_all().unwrap(), props);

    conn.close().unwrap();
    let err = conn.set_client_info("ClientUser", "ops").unwrap_err();
    assert_eq!(
        err,
        SqlError::ClientInfo {
            failed: vec!["ClientUser".to_string()]
        }
    );
    assert_eq!(raw.log().count("set_client_info"), 1);
}

/// 带选项创建的语句保留选项
#[test]
fn test_statement_options_forwarded() {
    let (raw, conn) = wrapped();
    let options = StatementOptions::new(ResultSetType::ScrollInsensitive, Concurrency::Updatable);
    let stmt = conn.create_statement_with(options).unwrap();

    assert_eq!(stmt.result_set_type().unwrap(), ResultSetType::ScrollInsensitive);
    assert_eq!(stmt.result_set_concurrency().unwrap(), Concurrency::Updatable);
    assert_eq!(raw.last_statement().unwrap().options(), options);

    let rs = stmt.execute_query(USERS_SQL).unwrap();
    assert!(rs.last().unwrap());
    assert_eq!(rs.get_i32(Column::Index(1)).unwrap(), Some(2));
    assert!(rs.absolute(1).unwrap());
    rs.update_value(Column::Label("name"), Value::String("alicia".into()))
        .unwrap();
    rs.update_row().unwrap();
    assert!(rs.row_updated().unwrap());
}

/// 生成键结果集
#[test]
fn test_generated_keys() {
    let (raw, conn) = wrapped();
    raw.register_update("INSERT INTO users (name) VALUES ('x')", 1);
    let stmt = conn.create_statement().unwrap();
    assert_eq!(
        stmt.execute_update_with_keys("INSERT INTO users (name) VALUES ('x')", GeneratedKeys::Returned)
            .unwrap(),
        1
    );
    let keys = stmt.generated_keys().unwrap();
    assert!(keys.next().unwrap());
    assert!(keys.get_i64(Column::Index(1)).unwrap().is_some());
    assert!(!keys.next().unwrap());
}

/// 数据库元数据的标量查询
#[test]
fn test_metadata_scalars() {
    let (raw, conn) = wrapped();
    let meta = conn.metadata().unwrap();

    assert_eq!(meta.database_product_name().unwrap(), "MockDB");
    assert_eq!(meta.driver_major_version(), 1);
    assert_eq!(meta.driver_minor_version(), 4);
    assert!(meta
        .supports_transaction_isolation_level(IsolationLevel::RepeatableRead)
        .unwrap());
    assert_eq!(raw.log().count("driver_major_version"), 1);
    assert_eq!(raw.log().count("supports_transaction_isolation_level"), 1);
}

/// 批处理
#[test]
fn test_batch_forwarding() {
    let (raw, conn) = wrapped();
    let stmt = conn.create_statement().unwrap();
    stmt.add_batch("UPDATE users SET name = 'x'").unwrap();
    stmt.add_batch("DELETE FROM audit").unwrap();
    assert_eq!(stmt.execute_batch().unwrap(), vec![2, 0]);
    assert_eq!(raw.log().count("add_batch"), 2);
}
