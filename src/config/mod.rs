use crate::api::interceptor::{Chain, LoggingInterceptor, MetricsInterceptor};
use crate::core::{SqlError, SqlResult};
use log::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 配置文件中生成的默认拦截器链
pub type ConfiguredInterceptor = Chain<LoggingInterceptor, MetricsInterceptor>;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub intercept: InterceptConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            intercept: InterceptConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "sql-delegate".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct InterceptConfig {
    /// 是否记录每一次转发调用
    pub log_calls: bool,
    pub call_log_level: String,
    /// 超过该耗时的调用以 warn 级别记录，0 表示不检测
    pub slow_call_threshold_ms: u64,
    pub metrics: bool,
    pub metrics_prefix: String,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            log_calls: false,
            call_log_level: "debug".to_string(),
            slow_call_threshold_ms: 0,
            metrics: false,
            metrics_prefix: "sql_delegate".to_string(),
        }
    }
}

impl InterceptConfig {
    /// 按配置构造拦截器链：日志在外层，指标在内层
    pub fn build(&self) -> SqlResult<ConfiguredInterceptor> {
        let logging = if self.log_calls {
            let level = Level::from_str(&self.call_log_level).map_err(|_| {
                SqlError::InvalidArgument(format!("无效的日志级别: {}", self.call_log_level))
            })?;
            let mut interceptor = LoggingInterceptor::new(level);
            if self.slow_call_threshold_ms > 0 {
                interceptor = interceptor
                    .with_slow_threshold(Duration::from_millis(self.slow_call_threshold_ms));
            }
            interceptor
        } else {
            LoggingInterceptor::disabled()
        };

        let metrics = if self.metrics {
            MetricsInterceptor::new(&self.metrics_prefix)
        } else {
            MetricsInterceptor::disabled()
        };

        Ok(Chain::new(logging, metrics))
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
