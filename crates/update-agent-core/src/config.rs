//! Runtime configuration, resolved once at startup.

use crate::paths;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How often the trigger marker is polled. Fixed; not configurable.
pub const TRIGGER_POLL_INTERVAL: Duration = Duration::from_secs(2);

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(3600);
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything the agent needs to run a check cycle and schedule the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Where the status record is published.
    pub output_file: PathBuf,
    /// Marker whose presence requests an immediate check.
    pub trigger_file: PathBuf,
    pub check_interval: Duration,
    pub poll_interval: Duration,
    pub command_timeout: Duration,
    /// Shell command producing the dry-run upgrade listing.
    pub upgrade_command: String,
    pub reboot_required_file: PathBuf,
    pub reboot_required_pkgs_file: PathBuf,
    /// Index-freshness proxies, most to least preferred.
    pub freshness_candidates: Vec<PathBuf>,
}

impl AgentConfig {
    /// Defaults with every host location resolved under `host_root`.
    pub fn for_host_root(host_root: &Path) -> Self {
        AgentConfig {
            output_file: PathBuf::from(paths::DEFAULT_OUTPUT_FILE),
            trigger_file: PathBuf::from(paths::DEFAULT_TRIGGER_FILE),
            check_interval: DEFAULT_CHECK_INTERVAL,
            poll_interval: TRIGGER_POLL_INTERVAL,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            upgrade_command: paths::default_upgrade_command(host_root),
            reboot_required_file: paths::reboot_required_path(host_root),
            reboot_required_pkgs_file: paths::reboot_required_pkgs_path(host_root),
            freshness_candidates: paths::freshness_candidates(host_root),
        }
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn with_trigger_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.trigger_file = path.into();
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_upgrade_command(mut self, command: impl Into<String>) -> Self {
        self.upgrade_command = command.into();
        self
    }

    /// First word of the upgrade command, used for the startup PATH check.
    pub fn upgrade_program(&self) -> Option<&str> {
        self.upgrade_command.split_whitespace().next()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig::for_host_root(Path::new(paths::DEFAULT_HOST_ROOT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AgentConfig::default();
        assert_eq!(config.output_file, PathBuf::from("/data/update-status.json"));
        assert_eq!(config.trigger_file, PathBuf::from("/data/trigger-refresh"));
        assert_eq!(config.check_interval, Duration::from_secs(3600));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.command_timeout, Duration::from_secs(120));
        assert_eq!(
            config.reboot_required_file,
            PathBuf::from("/host/var/run/reboot-required")
        );
        assert_eq!(config.freshness_candidates.len(), 3);
        assert_eq!(config.upgrade_program(), Some("apt-get"));
    }

    #[test]
    fn builders_override_fields() {
        let config = AgentConfig::for_host_root(Path::new("/mnt"))
            .with_output_file("/tmp/out.json")
            .with_trigger_file("/tmp/trigger")
            .with_check_interval(Duration::from_secs(60))
            .with_command_timeout(Duration::from_secs(5))
            .with_upgrade_command("printf 'Inst a\\n'");

        assert_eq!(config.output_file, PathBuf::from("/tmp/out.json"));
        assert_eq!(config.trigger_file, PathBuf::from("/tmp/trigger"));
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.command_timeout, Duration::from_secs(5));
        assert_eq!(config.upgrade_program(), Some("printf"));
        assert_eq!(
            config.reboot_required_pkgs_file,
            PathBuf::from("/mnt/var/run/reboot-required.pkgs")
        );
    }
}
