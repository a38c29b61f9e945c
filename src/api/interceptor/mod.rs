//! 拦截器
//!
//! 包装层把每一次转发调用交给拦截器，拦截器决定何时（以及是否）
//! 调用 `proceed` 执行被委托对象上的同名操作。默认实现直接调用 `proceed`，
//! 参数和结果都不做任何改变。
//!
//! 拦截器由根包装对象和它创建的所有子包装对象共享，
//! 因此在连接上安装的拦截器会作用到由它派生出的整个对象图。

pub mod logging;
pub mod metrics;

pub use logging::LoggingInterceptor;
pub use metrics::{MetricsInterceptor, OperationStats};

use crate::core::{SqlError, SqlResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 被包装的能力类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    Connection,
    Statement,
    PreparedStatement,
    CallableStatement,
    ResultSet,
    DatabaseMetaData,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Connection => "connection",
            Capability::Statement => "statement",
            Capability::PreparedStatement => "prepared_statement",
            Capability::CallableStatement => "callable_statement",
            Capability::ResultSet => "result_set",
            Capability::DatabaseMetaData => "database_metadata",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一次被拦截的调用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call<'a> {
    pub capability: Capability,
    pub operation: &'static str,
    /// 调用携带的 SQL 文本（如果有）
    pub sql: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub fn new(capability: Capability, operation: &'static str) -> Self {
        Self {
            capability,
            operation,
            sql: None,
        }
    }

    pub fn with_sql(mut self, sql: &'a str) -> Self {
        self.sql = Some(sql);
        self
    }
}

impl fmt::Display for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.capability, self.operation)
    }
}

/// 调用拦截器
pub trait Interceptor: Send + Sync + 'static {
    /// 包裹一次转发调用
    ///
    /// 实现必须最多调用一次 `proceed`；不调用时须自行给出结果。
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        let _ = call;
        proceed()
    }

    /// 父包装对象刚刚包装了一个子对象
    fn on_child(&self, parent: Capability, child: Capability) {
        let _ = (parent, child);
    }
}

/// 不做任何拦截
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Interceptor for Passthrough {}

/// 组合两个拦截器，`outer` 在外层
#[derive(Debug, Clone, Default)]
pub struct Chain<A, B> {
    outer: A,
    inner: B,
}

impl<A: Interceptor, B: Interceptor> Chain<A, B> {
    pub fn new(outer: A, inner: B) -> Self {
        Self { outer, inner }
    }

    pub fn outer(&self) -> &A {
        &self.outer
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

impl<A: Interceptor, B: Interceptor> Interceptor for Chain<A, B> {
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        self.outer
            .intercept(call, || self.inner.intercept(call, proceed))
    }

    fn on_child(&self, parent: Capability, child: Capability) {
        self.outer.on_child(parent, child);
        self.inner.on_child(parent, child);
    }
}

/// 错误转换拦截器
///
/// 成功结果原样返回，失败时用闭包转换错误。
pub struct ErrorMapper<M> {
    map: M,
}

impl<M> ErrorMapper<M>
where
    M: Fn(&Call<'_>, SqlError) -> SqlError + Send + Sync + 'static,
{
    pub fn new(map: M) -> Self {
        Self { map }
    }
}

impl<M> Interceptor for ErrorMapper<M>
where
    M: Fn(&Call<'_>, SqlError) -> SqlError + Send + Sync + 'static,
{
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        proceed().map_err(|e| (self.map)(call, e))
    }
}
