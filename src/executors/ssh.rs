use super::command::{ProbeCommand, run_silenced};
use super::CheckExecutor;
use crate::config::ProbeConfig;
use crate::core::errors::ExecError;
use crate::core::models::{ProbeStatus, Task};
use async_trait::async_trait;
use std::time::Duration;

/// Environment variable `sshpass -e` reads the password from.
const SSHPASS_ENV: &str = "SSHPASS";

/// Password login attempt through `sshpass` + `ssh`, pinned to be
/// non-interactive: password auth only, one prompt, no host key checks.
#[derive(Debug, Clone)]
pub struct SshProbe {
    config: ProbeConfig,
}

impl SshProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// ssh's own connect timeout leaves part of the deadline for the
    /// password exchange, which the hard deadline would otherwise cut off.
    pub fn connect_timeout(timeout: Duration) -> u64 {
        (timeout.as_secs() * 3 / 4).max(1)
    }

    pub fn command_for(&self, task: &Task, timeout: Duration) -> ProbeCommand {
        let (host, port) = task.endpoint();
        let connect_secs = Self::connect_timeout(timeout);

        let mut command = ProbeCommand::new(&self.config.sshpass)
            .arg("-e")
            .arg(&self.config.ssh)
            .args(["-p".to_string(), port.to_string(), "-T".to_string()])
            .args(["-o".to_string(), format!("ConnectTimeout={}", connect_secs)])
            .args(["-o", "PreferredAuthentications=password"])
            .args(["-o", "NumberOfPasswordPrompts=1"])
            .args(["-o", "UserKnownHostsFile=/dev/null"])
            .args(["-o", "StrictHostKeyChecking=no"]);

        for option in &self.config.extra_options {
            command = command.arg("-o").arg(option);
        }

        // destination may start with '-'
        command
            .arg("--")
            .arg(format!("{}@{}", task.principal, host))
            .env(SSHPASS_ENV, &task.credential)
    }
}

#[async_trait]
impl CheckExecutor for SshProbe {
    async fn execute(&self, task: &Task, timeout: Duration) -> Result<ProbeStatus, ExecError> {
        run_silenced(&self.command_for(task, timeout), timeout).await
    }
}
