use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_INPUT: &str = "data.csv";
pub const STDIO_PATH: &str = "-";

/// On-disk configuration. Every section and field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfig {
    pub run: RunSection,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunSection {
    pub timeout_secs: u64,
    pub parallelism: usize,
    pub report_failures: bool,
    pub output_format: OutputFormat,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            parallelism: num_cpus::get(),
            report_failures: false,
            output_format: OutputFormat::Csv,
        }
    }
}

/// Programs and extra `-o` options used to build the SSH probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub sshpass: String,
    pub ssh: String,
    pub extra_options: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            sshpass: "sshpass".to_string(),
            ssh: "ssh".to_string(),
            extra_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Jsonl,
}

/// `-` means the process's own stdin/stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stream {
    Std,
    File(PathBuf),
}

impl Stream {
    pub fn parse(raw: &str) -> Self {
        if raw == STDIO_PATH {
            Stream::Std
        } else {
            Stream::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Std => f.write_str(STDIO_PATH),
            Stream::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub timeout: Duration,
    pub parallelism: usize,
    pub report_failures: bool,
    pub output_format: OutputFormat,
    pub input: Stream,
    pub output: Stream,
    pub quiet: bool,
    pub probe: ProbeConfig,
}
