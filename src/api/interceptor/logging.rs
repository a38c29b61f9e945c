//! 调用日志拦截器
//!
//! 通过 `log` 门面记录每一次转发调用；失败和慢调用额外以 warn 级别记录。

use crate::api::interceptor::{Call, Capability, Interceptor};
use crate::core::SqlResult;
use log::Level;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct LoggingInterceptor {
    enabled: bool,
    level: Level,
    slow_threshold: Option<Duration>,
}

impl Default for LoggingInterceptor {
    fn default() -> Self {
        Self {
            enabled: true,
            level: Level::Debug,
            slow_threshold: None,
        }
    }
}

impl LoggingInterceptor {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// 不记录任何内容，调用原样放行
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn slow_threshold(&self) -> Option<Duration> {
        self.slow_threshold
    }
}

impl Interceptor for LoggingInterceptor {
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        if !self.enabled {
            return proceed();
        }

        match call.sql {
            Some(sql) => log::log!(self.level, "{} sql={}", call, sql),
            None => log::log!(self.level, "{}", call),
        }

        let start = Instant::now();
        let result = proceed();
        let elapsed = start.elapsed();

        if let Err(e) = &result {
            log::warn!("{} 失败 ({:?}): {}", call, elapsed, e);
        } else if let Some(threshold) = self.slow_threshold {
            if elapsed >= threshold {
                log::warn!("{} 慢调用: {:?} >= {:?}", call, elapsed, threshold);
            }
        }
        result
    }

    fn on_child(&self, parent: Capability, child: Capability) {
        if self.enabled {
            log::trace!("{} 包装子对象 {}", parent, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SqlError;

    #[test]
    fn test_logging_forwards_result() {
        let interceptor = LoggingInterceptor::new(Level::Info)
            .with_slow_threshold(Duration::from_millis(500));
        let call = Call::new(Capability::Statement, "execute").with_sql("DELETE FROM t");
        assert_eq!(interceptor.intercept(&call, || Ok(true)), Ok(true));

        let err = SqlError::Closed("statement".to_string());
        assert_eq!(
            interceptor.intercept::<bool, _>(&call, || Err(err.clone())),
            Err(err)
        );
    }

    #[test]
    fn test_disabled() {
        let interceptor = LoggingInterceptor::disabled();
        assert!(!interceptor.is_enabled());
        let call = Call::new(Capability::Connection, "commit");
        let mut calls = 0;
        interceptor
            .intercept(&call, || {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_defaults() {
        let interceptor = LoggingInterceptor::default();
        assert_eq!(interceptor.level(), Level::Debug);
        assert!(interceptor.slow_threshold().is_none());
    }
}
