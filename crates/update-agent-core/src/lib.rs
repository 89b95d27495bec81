pub mod agent;
pub mod config;
pub mod error;
pub mod freshness;
pub mod io;
pub mod paths;
pub mod reboot;
pub mod runner;
pub mod scheduler;
pub mod status;
pub mod trigger;
pub mod upgrades;

pub use agent::Agent;
pub use config::AgentConfig;
pub use error::{AgentError, Result};
pub use scheduler::{CheckCycle, Scheduler, TickOutcome};
pub use status::{RebootInfo, StatusRecord, UpgradeInfo};
