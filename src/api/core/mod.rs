//! API 核心层 - 客户端能力接口
//!
//! 定义连接、语句、预编译语句、存储过程调用、结果集和元数据的能力接口，
//! 驱动实现这些接口，委托包装层也实现同一组接口。

pub mod callable_statement;
pub mod connection;
pub mod metadata;
pub mod prepared_statement;
pub mod result_set;
pub mod statement;
pub mod wrapper;

pub use callable_statement::CallableStatement;
pub use connection::Connection;
pub use metadata::{DatabaseMetaData, ParameterMetaData, ResultSetMetaData};
pub use prepared_statement::PreparedStatement;
pub use result_set::ResultSet;
pub use statement::Statement;
pub use wrapper::{Wrapper, WrapperExt};
