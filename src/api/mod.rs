pub mod core;
pub mod delegate;
pub mod interceptor;

pub use self::core::{
    CallableStatement, Connection, DatabaseMetaData, ParameterMetaData, PreparedStatement,
    ResultSet, ResultSetMetaData, Statement, Wrapper, WrapperExt,
};
pub use delegate::{
    DelegateCallableStatement, DelegateConnection, DelegateDatabaseMetaData,
    DelegatePreparedStatement, DelegateResultSet, DelegateStatement,
};
pub use interceptor::{
    Call, Capability, Chain, ErrorMapper, Interceptor, LoggingInterceptor, MetricsInterceptor,
    Passthrough,
};
