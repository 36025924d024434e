use crate::config::types::{DEFAULT_INPUT, OutputFormat, STDIO_PATH};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "ssh-checker", version)]
#[command(about = "Check SSH credentials against hosts you administer, in parallel")]
pub struct Cli {
    /// Credentials CSV: user, password, host[:port] ("-" for stdin)
    #[arg(short = 'i', long = "input", default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Where working credentials are appended ("-" for stdout)
    #[arg(short = 'o', long = "output", default_value = STDIO_PATH)]
    pub output: String,

    /// Per-check timeout in seconds [default: 10]
    #[arg(short = 't', long = "timeout")]
    pub timeout: Option<u64>,

    /// Number of parallel checks [default: CPU count]
    #[arg(short = 'p', long = "parallel")]
    pub parallel: Option<usize>,

    /// Output record format [default: csv]
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Also report rejected and unreachable checks on stderr
    #[arg(long = "report-failures", action = ArgAction::SetTrue)]
    pub report_failures: bool,

    /// Config file (TOML)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// No progress bar or summary
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    pub quiet: bool,

    /// Verbose logs
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// Debug logs (implies verbose)
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,
}
