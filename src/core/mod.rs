pub mod error;
pub mod types;

// 错误和结果类型
pub use error::{SqlError, SqlResult};

// 客户端 API 数据类型
pub use types::*;
