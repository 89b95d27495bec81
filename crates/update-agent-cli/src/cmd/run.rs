use update_agent_core::{Agent, AgentConfig, Scheduler};

/// `update-agent run` — check on startup, then on schedule or on trigger,
/// until the process is signaled.
pub fn run(config: AgentConfig) -> anyhow::Result<()> {
    tracing::info!(output_file = %config.output_file.display(), "Output file");
    tracing::info!(trigger_file = %config.trigger_file.display(), "Trigger file");

    let agent = Agent::new(config.clone());
    agent.warn_if_program_missing();

    Scheduler::new(agent, &config).run_forever()
}
