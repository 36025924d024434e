use super::types::{FileConfig, RunConfig, Stream};
use crate::cli::args::Cli;
use crate::core::errors::{CheckerError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOCAL_CONFIG: &str = "./ssh-checker.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the file layer: an explicit path must exist, otherwise the
    /// first default location found is used, otherwise built-in defaults.
    pub fn load(custom_path: Option<&Path>) -> Result<FileConfig> {
        if let Some(path) = custom_path {
            return Self::load_from_file(path);
        }

        for path in Self::default_paths() {
            if path.exists() {
                tracing::info!("Loaded configuration from: {:?}", path);
                return Self::load_from_file(&path);
            }
        }

        tracing::debug!("No configuration file found, using default settings");
        Ok(FileConfig::default())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dirs) = ProjectDirs::from("", "", "ssh-checker") {
            paths.push(dirs.config_dir().join("config.toml"));
        }
        paths
    }

    fn load_from_file(path: &Path) -> Result<FileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CheckerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| CheckerError::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Layers CLI flags over the file config and validates the result.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<RunConfig> {
        let config = RunConfig {
            timeout: Duration::from_secs(cli.timeout.unwrap_or(file.run.timeout_secs)),
            parallelism: cli.parallel.unwrap_or(file.run.parallelism),
            report_failures: cli.report_failures || file.run.report_failures,
            output_format: cli.format.unwrap_or(file.run.output_format),
            input: Stream::parse(&cli.input),
            output: Stream::parse(&cli.output),
            quiet: cli.quiet,
            probe: file.probe,
        };

        Self::validate_config(&config)?;
        Ok(config)
    }

    fn validate_config(config: &RunConfig) -> Result<()> {
        if config.timeout.is_zero() {
            return Err(CheckerError::Config("timeout must be at least 1 second".into()));
        }

        if config.parallelism == 0 {
            return Err(CheckerError::Config("parallelism must be greater than 0".into()));
        }

        if config.probe.sshpass.trim().is_empty() || config.probe.ssh.trim().is_empty() {
            return Err(CheckerError::Config("probe program names cannot be empty".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::OutputFormat;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["ssh-checker"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_resolve() {
        let config = ConfigLoader::resolve(&cli(&[]), FileConfig::default()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.parallelism, num_cpus::get());
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.input, Stream::File(PathBuf::from("data.csv")));
        assert_eq!(config.output, Stream::Std);
        assert!(!config.report_failures);
    }

    #[test]
    fn test_load_custom_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
[run]
timeout_secs = 4
parallelism = 32
report_failures = true
output_format = "jsonl"

[probe]
sshpass = "/usr/local/bin/sshpass"
extra_options = ["LogLevel=QUIET"]
"#;
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let file = ConfigLoader::load(Some(temp_file.path())).unwrap();
        assert_eq!(file.run.timeout_secs, 4);
        assert_eq!(file.run.parallelism, 32);
        assert_eq!(file.probe.sshpass, "/usr/local/bin/sshpass");
        assert_eq!(file.probe.ssh, "ssh");

        let config = ConfigLoader::resolve(&cli(&[]), file).unwrap();
        assert!(config.report_failures);
        assert_eq!(config.output_format, OutputFormat::Jsonl);
        assert_eq!(config.probe.extra_options, vec!["LogLevel=QUIET"]);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = FileConfig::default();
        file.run.timeout_secs = 30;
        file.run.parallelism = 2;

        let args = cli(&["-t", "5", "-p", "64", "-i", "-"]);
        let config = ConfigLoader::resolve(&args, file).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.parallelism, 64);
        assert_eq!(config.input, Stream::Std);
    }

    #[test]
    fn test_zero_values_rejected() {
        let err = ConfigLoader::resolve(&cli(&["-t", "0"]), FileConfig::default()).unwrap_err();
        assert!(matches!(err, CheckerError::Config(_)));

        let err = ConfigLoader::resolve(&cli(&["-p", "0"]), FileConfig::default()).unwrap_err();
        assert!(matches!(err, CheckerError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = ConfigLoader::load(Some(Path::new("/nonexistent/ssh-checker.toml"))).unwrap_err();
        assert!(matches!(err, CheckerError::Config(_)));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[run]\ntimeout_secs = \"soon\"\n").unwrap();
        let err = ConfigLoader::load(Some(temp_file.path())).unwrap_err();
        assert!(err.to_string().contains("cannot parse"));
    }
}
