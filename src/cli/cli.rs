use clap::{Parser, ValueEnum};

/// Procstat Exporter - 按进程名采集 CPU / 内存 / PID 指标
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// 要监控的进程名（精确匹配），至少一个
    #[arg(value_name = "PROCESS", required = true, num_args = 1.., value_parser = parse_process_name)]
    pub processes: Vec<String>,

    /// 监听端口
    #[arg(short, long, env = "PORT", default_value_t = 9100)]
    pub port: u16,

    /// 监听地址
    #[arg(short = 'a', long, env = "ADDRESS", default_value = "0.0.0.0")]
    pub address: String,

    /// 采集与打印周期（秒）
    #[arg(short, long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// 采样失败时本轮剩余进程的处理方式
    #[arg(long, value_enum, default_value_t = SampleErrorPolicy::Continue)]
    pub on_sample_error: SampleErrorPolicy,

    /// 控制台打印时过滤掉的内部指标前缀
    #[arg(long, default_value = "process_")]
    pub internal_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleErrorPolicy {
    /// 记录错误，继续处理下一个进程
    Continue,
    /// 记录错误，放弃本轮剩余进程
    Abort,
}

impl CommandArgs {
    /// 去重，保留第一次出现的顺序
    pub fn process_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.processes.len());
        for name in &self.processes {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

fn parse_process_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("process name must not be empty".to_string());
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_process_is_usage_error() {
        let err = CommandArgs::try_parse_from(["procstat-exporter"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(CommandArgs::try_parse_from(["procstat-exporter", ""]).is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(CommandArgs::try_parse_from(["procstat-exporter", "-i", "0", "sshd"]).is_err());
    }

    #[test]
    fn test_defaults_and_dedup() {
        let args = CommandArgs::try_parse_from(["procstat-exporter", "sshd", "nginx", "sshd"]).unwrap();
        assert_eq!(args.process_names(), vec!["sshd".to_string(), "nginx".to_string()]);
        assert_eq!(args.interval, 5);
        assert_eq!(args.on_sample_error, SampleErrorPolicy::Continue);
        assert_eq!(args.internal_prefix, "process_");
    }

    #[test]
    fn test_abort_policy() {
        let args =
            CommandArgs::try_parse_from(["procstat-exporter", "--on-sample-error", "abort", "init"]).unwrap();
        assert_eq!(args.on_sample_error, SampleErrorPolicy::Abort);
    }
}
