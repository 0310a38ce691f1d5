use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use crate::error::SampleError;
use crate::models::ProcessUsage;

/// 读取某个 PID 的 CPU / 内存使用率
pub trait UsageSampler: Send {
    fn sample(&mut self, pid: u32) -> Result<ProcessUsage, SampleError>;
}

/// 基于 sysinfo 的实现
///
/// `System` 跨周期保留：CPU 使用率是两次刷新之间的差值，
/// 所以同一 PID 的第一次采样 CPU 为 0。
pub struct SysinfoSampler {
    system: System,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        // 先建立全局 CPU 基线，否则第二次采样仍然是 0
        system.refresh_cpu_usage();
        Self { system }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageSampler for SysinfoSampler {
    fn sample(&mut self, pid: u32) -> Result<ProcessUsage, SampleError> {
        let sysinfo_pid = Pid::from_u32(pid);

        self.system.refresh_memory();
        // remove_dead_processes = true，已退出的进程会从表里移除
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[sysinfo_pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let process = self
            .system
            .process(sysinfo_pid)
            .ok_or(SampleError::Vanished { pid })?;

        let total_memory = self.system.total_memory();
        if total_memory == 0 {
            return Err(SampleError::MemoryUnavailable);
        }

        let cpu_percent = process.cpu_usage() as f64;
        let mem_percent = process.memory() as f64 / total_memory as f64 * 100.0;

        if !cpu_percent.is_finite() || !mem_percent.is_finite() {
            return Err(SampleError::Read {
                pid,
                reason: format!("non-finite usage (cpu={}, mem={})", cpu_percent, mem_percent),
            });
        }

        Ok(ProcessUsage::new(cpu_percent, mem_percent))
    }
}
