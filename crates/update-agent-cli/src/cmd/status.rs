use crate::output::{join_or_dash, print_json};
use anyhow::Context;
use update_agent_core::{status::read_status, AgentConfig};

/// `update-agent status` — show what downstream readers currently see.
pub fn run(config: &AgentConfig, json: bool) -> anyhow::Result<()> {
    let record = read_status(&config.output_file).context("failed to load status")?;

    if json {
        return print_json(&record);
    }

    let upgrades = &record.upgrades;
    println!(
        "Upgrades:      {} available ({} security)",
        upgrades.total, upgrades.security
    );
    println!("  packages:    {}", join_or_dash(&upgrades.all_packages));
    println!("  security:    {}", join_or_dash(&upgrades.security_packages));
    println!(
        "Reboot:        {}",
        if record.reboot.required {
            "required"
        } else {
            "not required"
        }
    );
    if record.reboot.required {
        println!("  packages:    {}", join_or_dash(&record.reboot.packages));
    }
    println!(
        "Index refresh: {}",
        record
            .last_update_check
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string())
    );
    println!("Checked at:    {}", record.agent_timestamp.to_rfc3339());
    Ok(())
}
