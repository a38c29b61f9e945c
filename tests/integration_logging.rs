//! 日志集成测试
//!
//! 按配置文件初始化日志系统，经日志拦截器转发调用后检查日志文件内容

mod common;

use std::io::Write;

use common::{wrapped_with, USERS_SQL};
use serial_test::serial;
use sql_delegate::api::{Connection, Statement};
use sql_delegate::config::Config;
use sql_delegate::utils::logging;
use tempfile::{NamedTempFile, TempDir};

#[test]
#[serial]
fn test_call_logging_to_file() {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let mut file = NamedTempFile::new().expect("Failed to create temporary file");
    let content = format!(
        "[log]\nlevel = \"debug\"\ndir = {:?}\nfile = \"calls\"\n\n[intercept]\nlog_calls = true\ncall_log_level = \"info\"\n",
        dir.path().to_string_lossy()
    );
    file.write_all(content.as_bytes())
        .expect("Failed to write config");

    let config = Config::load(file.path()).expect("Failed to load config");
    logging::init(&config).expect("Failed to init logging");

    let (_raw, conn) = wrapped_with(config.intercept.build().unwrap());
    let stmt = conn.create_statement().unwrap();
    stmt.execute_query(USERS_SQL).unwrap();
    // 自动提交模式下提交失败，以 warn 级别记录
    assert!(conn.commit().is_err());

    logging::shutdown();

    let mut text = String::new();
    for entry in std::fs::read_dir(dir.path()).expect("Failed to read log directory") {
        let path = entry.expect("Failed to read entry").path();
        text.push_str(&std::fs::read_to_string(path).unwrap_or_default());
    }
    assert!(text.contains("connection.create_statement"));
    assert!(text.contains(&format!("statement.execute_query sql={}", USERS_SQL)));
    assert!(text.contains("connection.commit 失败"));
}
