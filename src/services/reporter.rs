use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::state::AppState;

pub const SEPARATOR: &str = "==========================================";

/// 定时把当前指标打印到控制台
pub struct Reporter {
    state: AppState,
    internal_prefix: String,
    interval: Duration,
}

impl Reporter {
    pub fn new(state: AppState, internal_prefix: impl Into<String>, interval: Duration) -> Self {
        Self {
            state,
            internal_prefix: internal_prefix.into(),
            interval,
        }
    }

    /// 生成一次输出，持有整轮锁，不会与调度器的更新交错
    pub fn render(&self) -> String {
        let _pass = self.state.lock_pass();

        let mut out = String::new();
        for series in self.state.metrics.snapshot() {
            if !self.internal_prefix.is_empty() && series.family.starts_with(&self.internal_prefix) {
                continue;
            }
            out.push_str(&format!("{} - {:.6}\n", series, series.value));
        }
        out.push_str(SEPARATOR);
        out.push('\n');
        out
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let reporter = Arc::new(self);
        loop {
            ticker.tick().await;

            let r = reporter.clone();
            match tokio::task::spawn_blocking(move || r.render()).await {
                Ok(dump) => print!("{}", dump),
                Err(e) => log::error!("Error gathering metrics: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsRegistry;
    use crate::models::{ProcessSample, ProcessUsage};
    use crate::state::new_state;
    use std::time::Instant;

    #[test]
    fn test_render_lines_and_separator() {
        let state = new_state(MetricsRegistry::new().unwrap());
        state
            .metrics
            .record("init", &ProcessSample::new(1, ProcessUsage::new(0.5, 0.25), Instant::now()));
        state.metrics.mark_not_found("sshd");

        let reporter = Reporter::new(state, "process_", Duration::from_secs(5));
        let dump = reporter.render();

        assert!(dump.contains("procstat_pid{process=\"init\"} - 1.000000\n"));
        assert!(dump.contains("procstat_cpu_percent{process=\"init\"} - 0.500000\n"));
        assert!(dump.contains("procstat_memory_percent{process=\"sshd\"} - 0.000000\n"));
        assert!(dump.ends_with(&format!("{}\n", SEPARATOR)));
        assert_eq!(dump.lines().count(), 7);
    }

    #[test]
    fn test_internal_series_filtered() {
        let metrics = MetricsRegistry::new().unwrap().with_self_metrics().unwrap();
        let state = new_state(metrics);
        state.metrics.mark_not_found("sshd");

        let dump = Reporter::new(state.clone(), "process_", Duration::from_secs(5)).render();
        assert!(!dump.lines().any(|l| l.starts_with("process_")));
        assert!(dump.contains("procstat_pid{process=\"sshd\"}"));

        // 过滤只作用在打印，/metrics 仍然完整输出
        #[cfg(target_os = "linux")]
        assert!(state.metrics.render().unwrap().contains("process_start_time_seconds"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let state = new_state(MetricsRegistry::new().unwrap().with_self_metrics().unwrap());
        state
            .metrics
            .record("nginx", &ProcessSample::new(300, ProcessUsage::new(3.0, 1.0), Instant::now()));

        let reporter = Reporter::new(state, "process_", Duration::from_secs(5));
        assert_eq!(reporter.render(), reporter.render());
    }

    #[test]
    fn test_empty_store_prints_only_separator() {
        let state = new_state(MetricsRegistry::new().unwrap());
        let dump = Reporter::new(state, "process_", Duration::from_secs(5)).render();
        assert_eq!(dump, format!("{}\n", SEPARATOR));
    }
}
