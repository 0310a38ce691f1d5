use std::ffi::OsStr;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use crate::error::ResolveError;

/// 进程名 -> PID 的解析
pub trait ProcessResolver: Send {
    /// 枚举当前所有进程，返回名称完全相等的第一个进程的 PID
    fn resolve(&mut self, name: &str) -> Result<Option<u32>, ResolveError>;
}

/// 基于 sysinfo 的实现
///
/// 每次调用都重新枚举进程表，不跨周期缓存：PID 和进程生命周期随时会变。
pub struct SysinfoResolver {
    system: System,
}

impl SysinfoResolver {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessResolver for SysinfoResolver {
    fn resolve(&mut self, name: &str) -> Result<Option<u32>, ResolveError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ResolveError::Unsupported);
        }

        // 只需要进程名，不读取 CPU/内存
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );

        if self.system.processes().is_empty() {
            return Err(ResolveError::EmptyProcessTable);
        }

        let target = OsStr::new(name);

        // 多个同名进程时取最小的 PID（与 /proc 的枚举顺序一致），线程不参与匹配
        let pid = self
            .system
            .processes()
            .iter()
            .filter(|(_, process)| process.thread_kind().is_none() && process.name() == target)
            .map(|(pid, _)| pid.as_u32())
            .min();

        match pid {
            Some(p) => log::debug!("Resolved '{}' to PID {}", name, p),
            None => log::warn!("Process with name {} not found", name),
        }

        Ok(pid)
    }
}
