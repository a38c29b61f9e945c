//! 调用指标拦截器
//!
//! 通过 `metrics` 门面上报调用次数、失败次数和耗时直方图，
//! 同时在进程内累计各操作的统计，可用 [`MetricsInterceptor::snapshot`] 读取。

use crate::api::interceptor::{Call, Capability, Interceptor};
use crate::core::SqlResult;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 单个操作的累计统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationStats {
    pub capability: Capability,
    pub operation: &'static str,
    pub calls: u64,
    pub errors: u64,
    pub total_time: Duration,
}

impl OperationStats {
    /// 平均耗时，无调用时为零
    pub fn average_time(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            let nanos = self.total_time.as_nanos() / u128::from(self.calls);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}

#[derive(Debug)]
pub struct MetricsInterceptor {
    enabled: bool,
    calls_metric: String,
    errors_metric: String,
    duration_metric: String,
    children_metric: String,
    stats: DashMap<(Capability, &'static str), OperationStats>,
    children: AtomicU64,
}

impl Default for MetricsInterceptor {
    fn default() -> Self {
        Self::new("sql_delegate")
    }
}

impl MetricsInterceptor {
    /// 以 `prefix` 为指标名前缀
    pub fn new(prefix: &str) -> Self {
        Self {
            enabled: true,
            calls_metric: format!("{}_calls_total", prefix),
            errors_metric: format!("{}_errors_total", prefix),
            duration_metric: format!("{}_call_duration_seconds", prefix),
            children_metric: format!("{}_children_wrapped_total", prefix),
            stats: DashMap::new(),
            children: AtomicU64::new(0),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn calls_metric(&self) -> &str {
        &self.calls_metric
    }

    /// 所有已观察操作的统计，按能力和操作名排序
    pub fn snapshot(&self) -> Vec<OperationStats> {
        let mut all: Vec<OperationStats> = self.stats.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| (a.capability, a.operation).cmp(&(b.capability, b.operation)));
        all
    }

    pub fn stats_for(&self, capability: Capability, operation: &'static str) -> Option<OperationStats> {
        self.stats.get(&(capability, operation)).map(|e| e.value().clone())
    }

    pub fn total_calls(&self) -> u64 {
        self.stats.iter().map(|e| e.value().calls).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.stats.iter().map(|e| e.value().errors).sum()
    }

    pub fn children_wrapped(&self) -> u64 {
        self.children.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.stats.clear();
        self.children.store(0, Ordering::Relaxed);
    }

    fn record(&self, call: &Call<'_>, elapsed: Duration, failed: bool) {
        let capability = call.capability.as_str();
        metrics::counter!(self.calls_metric.clone(), "capability" => capability, "operation" => call.operation)
            .increment(1);
        metrics::histogram!(self.duration_metric.clone(), "capability" => capability, "operation" => call.operation)
            .record(elapsed.as_secs_f64());
        if failed {
            metrics::counter!(self.errors_metric.clone(), "capability" => capability, "operation" => call.operation)
                .increment(1);
        }

        let mut entry = self
            .stats
            .entry((call.capability, call.operation))
            .or_insert_with(|| OperationStats {
                capability: call.capability,
                operation: call.operation,
                calls: 0,
                errors: 0,
                total_time: Duration::ZERO,
            });
        entry.calls += 1;
        entry.total_time += elapsed;
        if failed {
            entry.errors += 1;
        }
    }
}

impl Interceptor for MetricsInterceptor {
    fn intercept<T, F>(&self, call: &Call<'_>, proceed: F) -> SqlResult<T>
    where
        F: FnOnce() -> SqlResult<T>,
    {
        if !self.enabled {
            return proceed();
        }
        let start = Instant::now();
        let result = proceed();
        self.record(call, start.elapsed(), result.is_err());
        result
    }

    fn on_child(&self, parent: Capability, child: Capability) {
        if !self.enabled {
            return;
        }
        self.children.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(self.children_metric.clone(), "parent" => parent.as_str(), "child" => child.as_str())
            .increment(1);
    }
}
