mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use update_agent_core::{paths, AgentConfig};

#[derive(Parser)]
#[command(
    name = "update-agent",
    about = "Publish pending host package upgrades and reboot state as a JSON status file",
    version,
    propagate_version = true
)]
struct Cli {
    /// Where the status record is written
    #[arg(long, global = true, env = "UPDATE_STATUS_FILE", default_value = paths::DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,

    /// Marker file whose presence requests an immediate check
    #[arg(long, global = true, env = "TRIGGER_FILE", default_value = paths::DEFAULT_TRIGGER_FILE)]
    trigger_file: PathBuf,

    /// Seconds between scheduled checks
    #[arg(
        long,
        global = true,
        env = "CHECK_INTERVAL_SECONDS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    check_interval: u64,

    /// Directory the host filesystem is mounted at
    #[arg(long, global = true, env = "HOST_ROOT", default_value = paths::DEFAULT_HOST_ROOT)]
    host_root: PathBuf,

    /// Shell command producing the dry-run upgrade listing (default: apt-get against the host root)
    #[arg(long, global = true, env = "UPGRADE_COMMAND")]
    upgrade_command: Option<String>,

    /// Seconds before the upgrade listing command is killed
    #[arg(
        long,
        global = true,
        env = "COMMAND_TIMEOUT_SECONDS",
        default_value_t = 120,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    command_timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the check loop (default)
    Run,

    /// Run a single check cycle and exit
    Check,

    /// Ask a running agent to check now
    Trigger,

    /// Show the currently published status
    Status {
        /// Print the raw status record as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

impl Cli {
    fn agent_config(&self) -> AgentConfig {
        let mut config = AgentConfig::for_host_root(&self.host_root)
            .with_output_file(&self.output_file)
            .with_trigger_file(&self.trigger_file)
            .with_check_interval(Duration::from_secs(self.check_interval))
            .with_command_timeout(Duration::from_secs(self.command_timeout));
        if let Some(command) = &self.upgrade_command {
            config = config.with_upgrade_command(command);
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        None | Some(Commands::Run) | Some(Commands::Check) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = cli.agent_config();

    let result = match cli.command {
        None | Some(Commands::Run) => cmd::run::run(config),
        Some(Commands::Check) => cmd::check::run(config),
        Some(Commands::Trigger) => cmd::trigger::run(&config),
        Some(Commands::Status { json }) => cmd::status::run(&config, json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
