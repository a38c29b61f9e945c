//! sql-delegate - 数据库客户端 API 的委托包装层
//!
//! 为连接、语句、预编译语句、存储过程调用、结果集和数据库元数据
//! 提供逐一转发的包装类型。包装产生的子对象同样被包装，
//! 并持有指向父包装的非拥有引用；安装在连接上的拦截器作用于整个对象图。
//!
//! ```
//! use sql_delegate::api::{Connection, DelegateConnection, DelegateStatement, Statement, WrapperExt};
//! use sql_delegate::mock::MockConnection;
//!
//! let raw = MockConnection::new();
//! let conn = DelegateConnection::new(raw.clone());
//!
//! let stmt = conn.create_statement().unwrap();
//! assert!(stmt.is_wrapper_for::<DelegateStatement<dyn Statement>>().unwrap());
//! assert_eq!(conn.unwrap_as::<MockConnection>().unwrap().id(), raw.id());
//! stmt.close().unwrap();
//! ```

pub mod api;
pub mod config;
pub mod core;
pub mod mock;
pub mod utils;
