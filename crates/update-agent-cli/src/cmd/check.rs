use anyhow::Context;
use update_agent_core::{Agent, AgentConfig};

/// `update-agent check` — one check cycle, then exit.
pub fn run(config: AgentConfig) -> anyhow::Result<()> {
    let agent = Agent::new(config);
    agent.warn_if_program_missing();
    agent.check().context("update check failed")?;
    Ok(())
}
