//! One check cycle: inspect, aggregate, publish.

use crate::config::AgentConfig;
use crate::error::Result;
use crate::freshness::last_index_refresh;
use crate::reboot::inspect_reboot;
use crate::status::{write_status, StatusRecord};
use crate::upgrades::inspect_upgrades;
use chrono::Utc;

pub struct Agent {
    config: AgentConfig,
}

impl Agent {
    pub fn new(config: AgentConfig) -> Self {
        Agent { config }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run every inspector in order and assemble the record. Never fails;
    /// each inspector degrades to its empty value on its own.
    pub fn collect(&self) -> StatusRecord {
        let upgrades = inspect_upgrades(&self.config.upgrade_command, self.config.command_timeout);
        let reboot = inspect_reboot(
            &self.config.reboot_required_file,
            &self.config.reboot_required_pkgs_file,
        );
        let last_update_check = last_index_refresh(&self.config.freshness_candidates);

        StatusRecord {
            upgrades,
            reboot,
            last_update_check,
            agent_timestamp: Utc::now(),
        }
    }

    /// Full check cycle. Only the write can fail, in which case the previously
    /// published record is left untouched.
    pub fn check(&self) -> Result<StatusRecord> {
        tracing::info!("Checking for updates...");
        let record = self.collect();
        write_status(&self.config.output_file, &record)?;
        Ok(record)
    }

    /// Warn at startup when the upgrade listing's program isn't installed.
    /// Checks still run and simply report no upgrades.
    pub fn warn_if_program_missing(&self) {
        let Some(program) = self.config.upgrade_program() else {
            tracing::warn!("upgrade command is empty; upgrades will always report zero");
            return;
        };
        if which::which(program).is_err() {
            tracing::warn!(program, "upgrade command program not found on PATH");
        }
    }
}
