use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// One credential check: who to log in as, with what, and where.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "username")]
    pub principal: String,
    #[serde(rename = "password")]
    pub credential: String,
    #[serde(rename = "hostname")]
    pub target: String, // host or host:port
}

impl Task {
    pub fn new(
        principal: impl Into<String>,
        credential: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            principal: principal.into(),
            credential: credential.into(),
            target: target.into(),
        }
    }

    /// Splits `target` into host and port, defaulting to 22.
    ///
    /// `[::1]:2222` and `[::1]` have their brackets stripped. A bare IPv6
    /// address (more than one colon, no brackets) is taken as a host without
    /// a port.
    pub fn endpoint(&self) -> (&str, u16) {
        let target = self.target.as_str();

        if let Some(rest) = target.strip_prefix('[') {
            if let Some((host, tail)) = rest.split_once(']') {
                let port = tail
                    .strip_prefix(':')
                    .and_then(parse_port)
                    .unwrap_or(DEFAULT_SSH_PORT);
                return (host, port);
            }
        }

        if target.matches(':').count() > 1 {
            return (target, DEFAULT_SSH_PORT);
        }

        match target.rsplit_once(':') {
            Some((host, port)) => (host, parse_port(port).unwrap_or(DEFAULT_SSH_PORT)),
            None => (target, DEFAULT_SSH_PORT),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (host, port) = self.endpoint();
        write!(f, "{}@{}:{}", self.principal, host, port)
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// What the external probe reported, before classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeStatus {
    Exited(i32),
    Signaled,
    TimedOut,
}

/// `ssh` exits with 255 when it cannot reach or negotiate with the host.
pub const SSH_CONNECTION_FAILED: i32 = 255;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    AuthOrCheckFailed,
    Unreachable,
    ExecutionError(String),
}

impl Outcome {
    pub fn from_status(status: ProbeStatus) -> Self {
        match status {
            ProbeStatus::Exited(0) => Outcome::Success,
            ProbeStatus::Exited(SSH_CONNECTION_FAILED) | ProbeStatus::TimedOut => {
                Outcome::Unreachable
            }
            ProbeStatus::Exited(_) | ProbeStatus::Signaled => Outcome::AuthOrCheckFailed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::AuthOrCheckFailed => "rejected",
            Outcome::Unreachable => "unreachable",
            Outcome::ExecutionError(_) => "error",
        }
    }
}
