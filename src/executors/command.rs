use crate::core::errors::ExecError;
use crate::core::models::ProbeStatus;
use std::ffi::OsStr;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

/// A fully specified child process: program, argv and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl ProbeCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Runs a child with no stdin and discarded output, killing it once
/// `limit` elapses.
///
/// Only a failure to spawn or wait is an `Err`; a non-zero exit or a timeout
/// is a normal `ProbeStatus`.
pub async fn run_silenced(
    command: &ProbeCommand,
    limit: Duration,
) -> Result<ProbeStatus, ExecError> {
    let start = Instant::now();

    tracing::debug!("Executing: {} {:?}", command.program, command.args);

    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .envs(command.env.iter().map(|(k, v)| (OsStr::new(k), OsStr::new(v))))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| ExecError::new(&command.program, format!("failed to spawn: {}", e)))?;

    let status = match timeout(limit, child.wait()).await {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            return Err(ExecError::new(&command.program, format!("process error: {}", e)));
        }
        Err(_) => {
            let _ = child.kill().await;
            tracing::debug!(
                "{} timed out after {}ms",
                command.program,
                start.elapsed().as_millis()
            );
            return Ok(ProbeStatus::TimedOut);
        }
    };

    tracing::debug!(
        "{} exited with {:?} in {}ms",
        command.program,
        status.code(),
        start.elapsed().as_millis()
    );

    Ok(match status.code() {
        Some(code) => ProbeStatus::Exited(code),
        None => ProbeStatus::Signaled,
    })
}
