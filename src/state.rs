use crate::metrics::MetricsRegistry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// 每个进程上次成功采样的时间
#[derive(Debug, Default)]
pub struct LastUpdate {
    entries: HashMap<String, Instant>,
}

impl LastUpdate {
    /// 没有记录或距上次成功采样已超过 interval 时需要重新采样
    pub fn is_due(&self, name: &str, now: Instant, interval: Duration) -> bool {
        match self.entries.get(name) {
            Some(last) => now.saturating_duration_since(*last) >= interval,
            None => true,
        }
    }

    pub fn mark(&mut self, name: &str, at: Instant) {
        self.entries.insert(name.to_string(), at);
    }

    pub fn get(&self, name: &str) -> Option<Instant> {
        self.entries.get(name).copied()
    }
}

pub struct MonitorState {
    pub metrics: MetricsRegistry,
    /// 调度器整轮更新与 Reporter 打印共用这一把锁，两者不会交错执行
    pass_lock: Mutex<LastUpdate>,
}

pub type AppState = Arc<MonitorState>;

impl MonitorState {
    pub fn lock_pass(&self) -> MutexGuard<'_, LastUpdate> {
        // 某一轮 panic 不影响后续周期
        self.pass_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn new_state(metrics: MetricsRegistry) -> AppState {
    Arc::new(MonitorState {
        metrics,
        pass_lock: Mutex::new(LastUpdate::default()),
    })
}
