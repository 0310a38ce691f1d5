pub mod process;
pub mod stats;

pub use process::{ProcessSample, ProcessView, PID_NOT_FOUND};
pub use stats::ProcessUsage;
