//! 转发开销基准测试
//!
//! 比较直接调用内存驱动与经过包装层调用的耗时:
//! - 连接上的标量操作
//! - 创建语句并执行查询
//! - 结果集逐行读取

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use sql_delegate::api::interceptor::MetricsInterceptor;
use sql_delegate::api::{Connection, DelegateConnection, ResultSet, Statement};
use sql_delegate::core::{Column, Value};
use sql_delegate::mock::{MockConnection, MockRows};

const QUERY: &str = "SELECT id, name FROM bench";

fn seeded_connection(rows: usize) -> Arc<MockConnection> {
    let raw = MockConnection::new();
    let mut data = MockRows::new(&["id", "name"]);
    for i in 0..rows {
        data = data.with_row(vec![Value::Int(i as i32), Value::String(format!("row{}", i))]);
    }
    raw.register_query(QUERY, data);
    raw
}

fn targets() -> Vec<(&'static str, Arc<dyn Connection>)> {
    let raw: Arc<dyn Connection> = seeded_connection(100);
    let passthrough: Arc<dyn Connection> = DelegateConnection::new(seeded_connection(100));
    let metered: Arc<dyn Connection> =
        DelegateConnection::with_interceptor(seeded_connection(100), MetricsInterceptor::default());
    vec![("raw", raw), ("passthrough", passthrough), ("metrics", metered)]
}

fn bench_scalar(c: &mut Criterion) {
    let mut group = c.benchmark_group("connection_scalar");
    for (name, conn) in targets() {
        group.bench_with_input(BenchmarkId::new("auto_commit", name), &conn, |b, conn| {
            b.iter(|| black_box(conn.auto_commit().unwrap()));
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_and_query");
    for (name, conn) in targets() {
        group.bench_with_input(BenchmarkId::new("execute_query", name), &conn, |b, conn| {
            b.iter(|| {
                let stmt = conn.create_statement().unwrap();
                let rs = stmt.execute_query(black_box(QUERY)).unwrap();
                stmt.close().unwrap();
                black_box(rs)
            });
        });
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("result_set_scan");
    for (name, conn) in targets() {
        group.bench_with_input(BenchmarkId::new("next_get", name), &conn, |b, conn| {
            let stmt = conn.create_statement().unwrap();
            b.iter(|| {
                let rs = stmt.execute_query(QUERY).unwrap();
                let mut sum = 0i64;
                while rs.next().unwrap() {
                    sum += rs.get_i64(Column::Index(1)).unwrap().unwrap_or(0);
                }
                black_box(sum)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_scalar, bench_query, bench_scan);
criterion_main!(benches);
