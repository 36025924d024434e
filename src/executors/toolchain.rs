use crate::config::ProbeConfig;
use which::which;

/// Looks up the probe programs on PATH.
///
/// Returns the missing ones. A missing program is not fatal here: each
/// check will report it as an execution error.
pub fn missing_tools(config: &ProbeConfig) -> Vec<String> {
    let mut missing = Vec::new();

    for tool in [&config.sshpass, &config.ssh] {
        match which(tool) {
            Ok(path) => {
                tracing::debug!("Found {}: {:?}", tool, path);
            }
            Err(_) => {
                missing.push(tool.clone());
            }
        }
    }

    if missing.is_empty() {
        tracing::info!("All probe tools found");
    } else {
        tracing::warn!(
            "Missing probe tools: {}. Every check will fail to launch until they are installed",
            missing.join(", ")
        );
    }

    missing
}
