// 日志输出
//
// LoggingInterceptor 只写 `log` 门面，落盘由这里安装的 flexi_logger 负责

use crate::config::{Config, LogConfig};
use flexi_logger::{
    detailed_format, Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
    WriteMode,
};
use parking_lot::{const_mutex, Mutex};

static HANDLE: Mutex<Option<LoggerHandle>> = const_mutex(None);

/// 按 `[log]` 配置段构造日志器，不安装
fn build_logger(log: &LogConfig) -> Result<Logger, FlexiLoggerError> {
    Ok(Logger::try_with_str(&log.level)?
        .log_to_file(FileSpec::default().basename(&log.file).directory(&log.dir))
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(log.max_file_size),
            Naming::Numbers,
            Cleanup::KeepLogFiles(log.max_files),
        )
        .write_mode(WriteMode::Async)
        .append())
}

/// 安装全局日志器
///
/// 重复调用不做任何事。`log` 只接受一次全局日志器，
/// [`shutdown`] 之后同一进程内不能再次安装。
///
/// ```no_run
/// use sql_delegate::config::Config;
/// use sql_delegate::utils::logging;
///
/// let config = Config::load("sql-delegate.toml").unwrap_or_default();
/// logging::init(&config).expect("日志初始化失败");
/// ```
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    init_with(&config.log)
}

pub fn init_with(log: &LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut handle = HANDLE.lock();
    if handle.is_some() {
        return Ok(());
    }
    *handle = Some(build_logger(log)?.start()?);
    drop(handle);

    log::info!("调用日志写入 {}/{} (级别 {})", log.dir, log.file, log.level);
    Ok(())
}

/// 写完异步队列中的日志后卸下日志器
pub fn shutdown() {
    if let Some(handle) = HANDLE.lock().take() {
        handle.flush();
        handle.shutdown();
    }
}

pub fn is_initialized() -> bool {
    HANDLE.lock().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_level_rejected() {
        let log = LogConfig {
            level: "sql_delegate=nonsense".to_string(),
            ..LogConfig::default()
        };
        assert!(build_logger(&log).is_err());
    }

    #[test]
    #[serial]
    fn test_init_writes_file_and_shutdown_flushes() {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let mut config = Config::default();
        config.log.dir = dir.path().to_string_lossy().into_owned();
        config.log.file = "unit".to_string();

        init(&config).expect("Failed to init logging");
        assert!(is_initialized());
        assert!(init(&config).is_ok());

        log::warn!("connection.commit 失败");
        shutdown();
        assert!(!is_initialized());

        let text: String = std::fs::read_dir(dir.path())
            .expect("Failed to read log directory")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("unit"))
            .map(|e| std::fs::read_to_string(e.path()).unwrap_or_default())
            .collect();
        assert!(text.contains("connection.commit 失败"));
    }
}
