use serde::Serialize;
use std::time::Instant;
use crate::models::stats::ProcessUsage;

/// PID 为 0 表示进程未找到
pub const PID_NOT_FOUND: u32 = 0;

/// 一次成功采样的结果，每个周期重新计算，不做持久化
#[derive(Debug, Clone, Copy)]
pub struct ProcessSample {
    /// 进程 ID
    pub pid: u32,
    pub cpu_percent: f64,
    pub mem_percent: f64,
    /// 采样时间
    pub observed_at: Instant,
}

impl ProcessSample {
    pub fn new(pid: u32, usage: ProcessUsage, observed_at: Instant) -> Self {
        Self {
            pid,
            cpu_percent: usage.cpu_percent,
            mem_percent: usage.mem_percent,
            observed_at,
        }
    }
}

/// `/api/process/list` 返回的单个进程视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessView {
    /// 进程名称（即 metrics 上的 process 标签）
    pub name: String,
    /// 首次周期之前为 None
    pub pid: Option<u32>,
    pub cpu_percent: Option<f64>,
    pub mem_percent: Option<f64>,
    /// pid 为 0 时表示当前未找到
    pub found: bool,
}
