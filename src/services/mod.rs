pub mod process_resolver;
pub mod reporter;
pub mod scheduler;
pub mod usage_sampler;

pub use process_resolver::{ProcessResolver, SysinfoResolver};
pub use reporter::Reporter;
pub use scheduler::UpdateScheduler;
pub use usage_sampler::{SysinfoSampler, UsageSampler};
