//! Pending upgrade detection from a dry-run upgrade listing.

use crate::runner::{run_command, CommandOutput};
use crate::status::UpgradeInfo;
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

fn install_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Inst\s+(\S+)").expect("valid regex"))
}

/// Run the listing command and classify what it reports.
///
/// A failed or silent command means "no known upgrades", not an error.
pub fn inspect_upgrades(command: &str, timeout: Duration) -> UpgradeInfo {
    let output = run_command(command, timeout);
    upgrades_from_output(&output)
}

pub fn upgrades_from_output(output: &CommandOutput) -> UpgradeInfo {
    if output.exit_code != 0 || output.stdout.is_empty() {
        if let Some(failure) = &output.failure {
            tracing::warn!(?failure, "upgrade listing did not complete");
        } else {
            tracing::debug!(
                exit_code = output.exit_code,
                "upgrade listing reported nothing"
            );
        }
        return UpgradeInfo::default();
    }
    parse_upgrade_listing(&output.stdout)
}

/// Extract package names from `Inst <name> ...` lines.
///
/// Lines that don't start with the install marker are skipped. A line counts
/// as a security upgrade when "security" appears anywhere in it, in any case.
pub fn parse_upgrade_listing(text: &str) -> UpgradeInfo {
    let mut all_packages = Vec::new();
    let mut security_packages = Vec::new();

    for line in text.lines() {
        let Some(caps) = install_line_re().captures(line) else {
            continue;
        };
        let name = caps[1].to_string();
        if line.to_lowercase().contains("security") {
            security_packages.push(name.clone());
        }
        all_packages.push(name);
    }

    UpgradeInfo::from_packages(all_packages, security_packages)
}
