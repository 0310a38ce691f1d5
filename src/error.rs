use thiserror::Error;

/// 进程枚举失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("process enumeration is not supported on this platform")]
    Unsupported,

    #[error("process table is empty, enumeration failed")]
    EmptyProcessTable,
}

/// 资源读取失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// 解析到 PID 之后、采样之前进程已退出
    #[error("process {pid} vanished before it could be sampled")]
    Vanished { pid: u32 },

    #[error("total memory is unavailable, cannot compute memory percent")]
    MemoryUnavailable,

    #[error("failed to read usage for process {pid}: {reason}")]
    Read { pid: u32, reason: String },
}

impl SampleError {
    /// 进程已消失时按 "未找到" 处理，其余错误保留上次的有效值
    pub fn is_vanished(&self) -> bool {
        matches!(self, SampleError::Vanished { .. })
    }
}
