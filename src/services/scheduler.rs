use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

use crate::cli::SampleErrorPolicy;
use crate::models::{ProcessSample, PID_NOT_FOUND};
use crate::services::{ProcessResolver, UsageSampler};
use crate::state::AppState;

/// 一轮更新的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub sampled: usize,
    pub skipped: usize,
    pub not_found: usize,
    pub failed: usize,
    /// 采样失败后放弃了本轮剩余的进程
    pub aborted: bool,
}

/// 定时更新进程指标
///
/// 每一轮在 `MonitorState` 的整轮锁内按输入顺序处理所有进程：
/// - 未找到：三个 gauge 置 0，不更新时间戳
/// - 找到且已过期：采样并写入，记录本次时间
/// - 找到但未过期：跳过，保留现有值
/// - 采样失败：进程已退出按未找到处理，其他错误保留上一次的有效值
pub struct UpdateScheduler {
    names: Vec<String>,
    interval: Duration,
    policy: SampleErrorPolicy,
    resolver: Box<dyn ProcessResolver>,
    sampler: Box<dyn UsageSampler>,
    state: AppState,
}

impl UpdateScheduler {
    pub fn new(
        names: Vec<String>,
        interval: Duration,
        policy: SampleErrorPolicy,
        resolver: Box<dyn ProcessResolver>,
        sampler: Box<dyn UsageSampler>,
        state: AppState,
    ) -> Self {
        // 首次成功采样之前，每个进程都以 0 占位
        for name in &names {
            state.metrics.mark_not_found(name);
        }

        Self {
            names,
            interval,
            policy,
            resolver,
            sampler,
            state,
        }
    }

    pub fn run_pass(&mut self) -> PassReport {
        self.run_pass_at(Instant::now())
    }

    pub fn run_pass_at(&mut self, now: Instant) -> PassReport {
        let metrics = &self.state.metrics;
        let mut last_update = self.state.lock_pass();
        let mut report = PassReport::default();
        let mut enumeration_failed = false;

        for name in &self.names {
            // 枚举失败后本轮剩余进程都按未找到处理，不再重复枚举
            let pid = if enumeration_failed {
                None
            } else {
                match self.resolver.resolve(name) {
                    Ok(pid) => pid,
                    Err(e) => {
                        log::error!("Error getting processes: {}", e);
                        enumeration_failed = true;
                        None
                    }
                }
            };

            let Some(pid) = pid.filter(|p| *p != PID_NOT_FOUND) else {
                metrics.mark_not_found(name);
                report.not_found += 1;
                continue;
            };

            if !last_update.is_due(name, now, self.interval) {
                log::debug!("Skipping '{}' (PID {}), sampled less than {:?} ago", name, pid, self.interval);
                report.skipped += 1;
                continue;
            }

            match self.sampler.sample(pid) {
                Ok(usage) => {
                    let sample = ProcessSample::new(pid, usage, now);
                    metrics.record(name, &sample);
                    last_update.mark(name, sample.observed_at);
                    report.sampled += 1;
                }
                Err(e) if e.is_vanished() => {
                    log::warn!("Process '{}' exited before sampling: {}", name, e);
                    metrics.mark_not_found(name);
                    report.not_found += 1;
                }
                Err(e) => {
                    log::error!("Error sampling process '{}' (PID {}): {}", name, pid, e);
                    report.failed += 1;

                    if self.policy == SampleErrorPolicy::Abort {
                        log::warn!("Abandoning the rest of this update pass");
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        report
    }

    /// 每个周期在阻塞线程池里执行一轮，首个周期立即执行
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!(
            "Update scheduler started for {} process(es) with {}s interval",
            self.names.len(),
            self.interval.as_secs()
        );

        loop {
            ticker.tick().await;

            let pass = tokio::task::spawn_blocking(move || {
                let report = self.run_pass();
                (self, report)
            });

            match pass.await {
                Ok((scheduler, report)) => {
                    log::debug!("Update pass finished: {:?}", report);
                    self = scheduler;
                }
                Err(e) => {
                    log::error!("Update pass panicked, scheduler stopped: {}", e);
                    return;
                }
            }
        }
    }
}
