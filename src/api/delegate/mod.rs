//! 委托包装层
//!
//! 每个能力接口对应一个包装类型，持有被委托对象并逐一转发全部操作：
//!
//! | 能力 | 包装 |
//! |------|------|
//! | `Connection` | [`DelegateConnection`] |
//! | `Statement` | [`DelegateStatement`] |
//! | `PreparedStatement` | [`DelegatePreparedStatement`] |
//! | `CallableStatement` | [`DelegateCallableStatement`] |
//! | `ResultSet` | [`DelegateResultSet`] |
//! | `DatabaseMetaData` | [`DelegateDatabaseMetaData`] |
//!
//! 产生子对象的操作在返回前把子对象包装起来，子包装共享父包装的拦截器，
//! 并持有指向父包装的非拥有引用。`ResultSetMetaData` 和 `ParameterMetaData`
//! 不包装，原样返回。

pub mod callable_statement;
pub mod connection;
pub mod metadata;
pub mod prepared_statement;
pub mod result_set;
pub mod statement;

pub use connection::DelegateConnection;
pub use metadata::DelegateDatabaseMetaData;
pub use result_set::DelegateResultSet;
pub use statement::{DelegateCallableStatement, DelegatePreparedStatement, DelegateStatement};

use crate::core::{SqlResult, TypeKey};
use std::any::Any;

/// 分层自省：包装自身、拦截器、被委托对象，依次尝试
pub(crate) fn unwrap_layered<'a>(
    this: &'a dyn Any,
    interceptor: &'a dyn Any,
    key: TypeKey,
    delegate: impl FnOnce() -> SqlResult<&'a dyn Any>,
) -> SqlResult<&'a dyn Any> {
    if key.matches(this) {
        return Ok(this);
    }
    if key.matches(interceptor) {
        return Ok(interceptor);
    }
    delegate()
}
