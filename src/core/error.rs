//! 统一错误处理 for sql-delegate
//!
//! ## 设计理念
//!
//! 1. **原样传播**：驱动返回的错误由包装层原样返回，不做捕获或重新分类
//! 2. **可克隆**：`SqlError` 实现 `Clone`，驱动可以缓存错误并重复返回
//! 3. **SQLSTATE**：每个错误都能给出标准 SQLSTATE，便于调用方按类别处理
//!
//! 包装层自身只引入两类错误：自省失败（[`SqlError::NotWrapperFor`]）
//! 和所属对象已释放（[`SqlError::OwnerReleased`]）。

use thiserror::Error;

/// 统一的数据库客户端错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SqlError {
    #[error("数据库错误 [{sql_state}] ({vendor_code}): {message}")]
    Database {
        sql_state: String,
        vendor_code: i32,
        message: String,
    },

    #[error("对象已关闭: {0}")]
    Closed(String),

    #[error("不支持的功能: {0}")]
    FeatureNotSupported(String),

    #[error("不是 {0} 的包装器")]
    NotWrapperFor(&'static str),

    #[error("所属对象已释放: {0}")]
    OwnerReleased(&'static str),

    #[error("无效的参数: {0}")]
    InvalidArgument(String),

    #[error("客户端信息设置失败: {failed:?}")]
    ClientInfo { failed: Vec<String> },

    #[error("操作超时: {0}")]
    Timeout(String),

    #[error("IO错误: {0}")]
    Io(String),
}

/// 统一的结果类型
pub type SqlResult<T> = Result<T, SqlError>;

impl SqlError {
    /// 构造带 SQLSTATE 的数据库错误
    pub fn database(sql_state: impl Into<String>, vendor_code: i32, message: impl Into<String>) -> Self {
        SqlError::Database {
            sql_state: sql_state.into(),
            vendor_code,
            message: message.into(),
        }
    }

    /// 标准 SQLSTATE
    ///
    /// 驱动错误返回驱动给出的值，其余变体映射到对应的标准类别
    pub fn sql_state(&self) -> &str {
        match self {
            SqlError::Database { sql_state, .. } => sql_state,
            SqlError::Closed(_) => "08003",
            SqlError::FeatureNotSupported(_) => "0A000",
            SqlError::NotWrapperFor(_) => "HY000",
            SqlError::OwnerReleased(_) => "HY000",
            SqlError::InvalidArgument(_) => "HY009",
            SqlError::ClientInfo { .. } => "HY000",
            SqlError::Timeout(_) => "HYT00",
            SqlError::Io(_) => "08S01",
        }
    }

    /// 驱动厂商错误码，非驱动错误为 0
    pub fn vendor_code(&self) -> i32 {
        match self {
            SqlError::Database { vendor_code, .. } => *vendor_code,
            _ => 0,
        }
    }

    /// 是否为连接类错误（SQLSTATE 类别 08）
    pub fn is_connection_error(&self) -> bool {
        self.sql_state().starts_with("08")
    }
}

impl From<std::io::Error> for SqlError {
    fn from(err: std::io::Error) -> Self {
        SqlError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_keeps_state() {
        let err = SqlError::database("23505", 1062, "duplicate key");
        assert_eq!(err.sql_state(), "23505");
        assert_eq!(err.vendor_code(), 1062);
        assert!(err.to_string().contains("duplicate key"));
    }

    #[test]
    fn test_standard_states() {
        assert_eq!(SqlError::Closed("statement".into()).sql_state(), "08003");
        assert!(SqlError::Closed("statement".into()).is_connection_error());
        assert_eq!(SqlError::FeatureNotSupported("x".into()).sql_state(), "0A000");
        assert_eq!(SqlError::NotWrapperFor("T").vendor_code(), 0);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: SqlError = io.into();
        assert!(matches!(err, SqlError::Io(ref m) if m.contains("pipe closed")));
        assert!(err.is_connection_error());
    }
}
