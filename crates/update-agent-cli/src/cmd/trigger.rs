use anyhow::Context;
use update_agent_core::{trigger::create_trigger, AgentConfig};

/// `update-agent trigger` — drop the marker a running agent polls for.
pub fn run(config: &AgentConfig) -> anyhow::Result<()> {
    create_trigger(&config.trigger_file).with_context(|| {
        format!(
            "failed to create trigger file {}",
            config.trigger_file.display()
        )
    })?;
    println!(
        "Refresh triggered - update check will run within {} seconds",
        config.poll_interval.as_secs()
    );
    Ok(())
}
