//! Sheepdog Process Metrics
//!
//! When a pid file is configured, every scrape reads it again (Sheepdog may have
//! restarted since the last one) and adds the standard `process_*` metrics of
//! that pid under the `sheepdog` namespace.

use crate::error::{ExporterError, Result};
use prometheus::Registry;
use std::path::Path;

/// Reads a pid file holding a single decimal pid, surrounding whitespace allowed
pub fn read_pid(path: &Path) -> Result<i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ExporterError::Config(format!("can't read pid file {}: {}", path.display(), e))
    })?;
    let trimmed = content.trim();
    match trimmed.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(ExporterError::Config(format!(
            "can't parse pid file {}: {:?}",
            path.display(),
            trimmed
        ))),
    }
}

/// Registers process metrics for the pid found in `pid_file`
#[cfg(target_os = "linux")]
pub fn register_process_metrics(registry: &Registry, pid_file: &Path, namespace: &str) -> Result<()> {
    use prometheus::process_collector::ProcessCollector;

    let pid = read_pid(pid_file)?;
    registry.register(Box::new(ProcessCollector::new(pid, namespace)))?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn register_process_metrics(_registry: &Registry, pid_file: &Path, _namespace: &str) -> Result<()> {
    read_pid(pid_file)?;
    Err(ExporterError::Config(
        "process metrics are only available on Linux".to_string(),
    ))
}
