//! 集成测试共享工具模块
//!
//! 提供内存驱动之上的包装连接和常用测试数据

use std::sync::Arc;

use sql_delegate::api::interceptor::{Interceptor, MetricsInterceptor};
use sql_delegate::api::DelegateConnection;
use sql_delegate::core::Value;
use sql_delegate::mock::{MockConnection, MockRows};

pub const USERS_SQL: &str = "SELECT id, name FROM users";

/// users 表的两行数据
pub fn user_rows() -> MockRows {
    MockRows::new(&["id", "name"])
        .with_row(vec![Value::Int(1), Value::String("alice".into())])
        .with_row(vec![Value::Int(2), Value::String("bob".into())])
}

/// 创建预置了 users 查询的内存连接
pub fn mock_connection() -> Arc<MockConnection> {
    let raw = MockConnection::new();
    raw.register_query(USERS_SQL, user_rows());
    raw.register_update("UPDATE users SET name = 'x'", 2);
    raw
}

/// 不带拦截的包装连接
pub fn wrapped() -> (Arc<MockConnection>, Arc<DelegateConnection>) {
    let raw = mock_connection();
    let conn = DelegateConnection::new(raw.clone());
    (raw, conn)
}

/// 带指定拦截器的包装连接
pub fn wrapped_with<I: Interceptor>(interceptor: I) -> (Arc<MockConnection>, Arc<DelegateConnection<I>>) {
    let raw = mock_connection();
    let conn = DelegateConnection::with_interceptor(raw.clone(), interceptor);
    (raw, conn)
}

/// 带指标拦截器的包装连接
pub fn metered() -> (Arc<MockConnection>, Arc<DelegateConnection<MetricsInterceptor>>) {
    wrapped_with(MetricsInterceptor::new("test_db"))
}
