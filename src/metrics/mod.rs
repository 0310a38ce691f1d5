use anyhow::Context;
use prometheus::proto::MetricType;
use prometheus::{register_gauge_vec_with_registry, Encoder, GaugeVec, Opts, Registry, TextEncoder};
use std::fmt;

use crate::models::{ProcessSample, ProcessView, PID_NOT_FOUND};

pub const CPU_PERCENT: &str = "procstat_cpu_percent";
pub const MEMORY_PERCENT: &str = "procstat_memory_percent";
pub const PID: &str = "procstat_pid";

/// 所有 gauge 共用的标签
pub const PROCESS_LABEL: &str = "process";

/// 进程指标存储
///
/// 三个 gauge family 注册在私有的 `Registry` 上，`Registry` 自身是线程安全的，
/// 所以 `/metrics` 可以随时读取，不需要等待调度器的整轮锁。
/// 未找到的进程三个值都写 0.0，这是占位值，不是真实测量结果。
pub struct MetricsRegistry {
    registry: Registry,

    pub cpu_percent: GaugeVec,
    pub memory_percent: GaugeVec,
    pub pid: GaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let labels = &[PROCESS_LABEL];

        let cpu_percent = register_gauge_vec_with_registry!(
            Opts::new(CPU_PERCENT, "Process CPU usage percentage"),
            labels,
            registry
        )?;

        let memory_percent = register_gauge_vec_with_registry!(
            Opts::new(MEMORY_PERCENT, "Process resident memory as a percentage of total memory"),
            labels,
            registry
        )?;

        let pid = register_gauge_vec_with_registry!(
            Opts::new(PID, "Process PID, 0 when the process is not found"),
            labels,
            registry
        )?;

        Ok(Self {
            registry,
            cpu_percent,
            memory_percent,
            pid,
        })
    }

    /// 额外注册 exporter 自身的 process_* 指标（仅 Linux）
    pub fn with_self_metrics(self) -> prometheus::Result<Self> {
        #[cfg(target_os = "linux")]
        {
            let collector = prometheus::process_collector::ProcessCollector::for_self();
            self.registry.register(Box::new(collector))?;
        }
        Ok(self)
    }

    pub fn set_cpu(&self, name: &str, value: f64) {
        self.cpu_percent.with_label_values(&[name]).set(value);
    }

    pub fn set_mem(&self, name: &str, value: f64) {
        self.memory_percent.with_label_values(&[name]).set(value);
    }

    pub fn set_pid(&self, name: &str, value: f64) {
        self.pid.with_label_values(&[name]).set(value);
    }

    pub fn record(&self, name: &str, sample: &ProcessSample) {
        self.set_cpu(name, sample.cpu_percent);
        self.set_mem(name, sample.mem_percent);
        self.set_pid(name, sample.pid as f64);
    }

    pub fn mark_not_found(&self, name: &str) {
        self.set_cpu(name, 0.0);
        self.set_mem(name, 0.0);
        self.set_pid(name, PID_NOT_FOUND as f64);
    }

    /// 读取当前所有 gauge/counter 序列，按 family 名和标签排序
    pub fn snapshot(&self) -> Vec<SeriesValue> {
        let mut series = Vec::new();

        for family in self.registry.gather() {
            let kind = family.get_field_type();
            for metric in family.get_metric() {
                let value = match kind {
                    MetricType::GAUGE => metric.get_gauge().get_value(),
                    MetricType::COUNTER => metric.get_counter().get_value(),
                    _ => continue,
                };

                series.push(SeriesValue {
                    family: family.get_name().to_string(),
                    labels: metric
                        .get_label()
                        .iter()
                        .map(|l| (l.get_name().to_string(), l.get_value().to_string()))
                        .collect(),
                    value,
                });
            }
        }

        series
    }

    /// 按输入顺序返回每个进程的当前值，首次采集之前字段为 None
    pub fn process_views(&self, names: &[String]) -> Vec<ProcessView> {
        let series = self.snapshot();
        let lookup = |family: &str, name: &str| {
            series
                .iter()
                .find(|s| s.family == family && s.label(PROCESS_LABEL) == Some(name))
                .map(|s| s.value)
        };

        names
            .iter()
            .map(|name| {
                let pid = lookup(PID, name).map(|v| v as u32);
                ProcessView {
                    name: name.clone(),
                    pid,
                    cpu_percent: lookup(CPU_PERCENT, name),
                    mem_percent: lookup(MEMORY_PERCENT, name),
                    found: pid.is_some_and(|p| p != PID_NOT_FOUND),
                }
            })
            .collect()
    }

    /// 文本格式 0.0.4，输出全部序列，不做前缀过滤
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::with_capacity(1024);
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .context("failed to encode metric families")?;
        String::from_utf8(buffer).context("exposition output is not valid UTF-8")
    }
}

/// 单条指标序列的只读快照
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesValue {
    pub family: String,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl SeriesValue {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for SeriesValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)?;
        if !self.labels.is_empty() {
            let labels = self
                .labels
                .iter()
                .map(|(k, v)| format!("{}=\"{}\"", k, v))
                .collect::<Vec<_>>()
                .join(",");
            write!(f, "{{{}}}", labels)?;
        }
        Ok(())
    }
}
