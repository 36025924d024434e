pub mod command;
pub mod ssh;
pub mod toolchain;

use crate::core::errors::ExecError;
use crate::core::models::{ProbeStatus, Task};
use async_trait::async_trait;
use std::time::Duration;

pub use ssh::SshProbe;

/// Runs the external check for one task.
///
/// `Err` means the probe could not be run at all. Anything the probe itself
/// reports, including a timeout, comes back as a `ProbeStatus`.
#[async_trait]
pub trait CheckExecutor: Send + Sync {
    async fn execute(&self, task: &Task, timeout: Duration) -> Result<ProbeStatus, ExecError>;
}
