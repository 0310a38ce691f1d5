use serde::Serialize;

/// 单次采样读到的资源使用率
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct ProcessUsage {
    /// CPU 使用率 (单核百分比，多线程进程可能超过 100)
    pub cpu_percent: f64,

    /// 常驻内存占物理内存的百分比 (0-100)
    pub mem_percent: f64,
}

impl ProcessUsage {
    pub fn new(cpu_percent: f64, mem_percent: f64) -> Self {
        Self {
            cpu_percent,
            mem_percent,
        }
    }
}
